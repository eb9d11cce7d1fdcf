#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The world owns every enemy, tower and balance of a session. It changes
//! only through [`apply`], and observers read it through [`query`].

mod economy;
mod enemies;
mod placement;
mod towers;
mod ui;

use lane_defence_core::{
    Command, ConfigError, ContextMenu, EnemyStats, Event, GameConfig, PathModel, Point,
    PlacementError, ShotEffect, TemplateIndex, TowerId, UpgradeError, WELCOME_BANNER,
};
use tracing::{debug, info, trace};

use crate::{
    economy::Economy,
    enemies::{Departure, EnemyRoster},
    towers::TowerRegistry,
    ui::UiState,
};

/// Transient text shown to the player for a fixed number of ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    remaining_ticks: u32,
}

impl StatusMessage {
    /// Text of the message.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Ticks left before the message disappears.
    #[must_use]
    pub const fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }
}

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    path: PathModel,
    enemies: EnemyRoster,
    towers: TowerRegistry,
    economy: Economy,
    ui: UiState,
    game_over: bool,
    tick_index: u64,
}

impl World {
    /// Creates a world for a fresh session using the provided configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let path = config.path_model()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            economy: Economy::new(&config.economy),
            enemies: EnemyRoster::new(),
            towers: TowerRegistry::new(),
            ui: UiState::default(),
            game_over: false,
            tick_index: 0,
            path,
            config,
        })
    }

    fn show_status(&mut self, text: String) {
        self.ui.show(text, self.config.layout.status_ticks);
    }

    fn place_tower(
        &mut self,
        template: TemplateIndex,
        position: Point,
    ) -> Result<TowerId, PlacementError> {
        let Some(spec) = self.config.template(template) else {
            return Err(PlacementError::UnknownTemplate);
        };

        placement::validate(
            &self.economy,
            &self.path,
            &self.towers,
            &self.config.placement,
            spec,
            position,
        )?;

        if !self.economy.spend(spec.cost) {
            return Err(PlacementError::InsufficientFunds {
                cost: spec.cost,
                available: self.economy.currency,
            });
        }
        Ok(self.towers.insert(template, spec, position))
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<u32, UpgradeError> {
        let rules = &self.config.upgrades;
        let Some(entry) = self.towers.get_mut(tower) else {
            return Err(UpgradeError::MissingTower);
        };

        if !entry.can_upgrade(rules) {
            return Err(UpgradeError::MaxLevel);
        }
        if !self.economy.spend(entry.upgrade_cost) {
            return Err(UpgradeError::InsufficientFunds {
                cost: entry.upgrade_cost,
                available: self.economy.currency,
            });
        }

        entry.upgrade(rules);
        Ok(entry.level)
    }

    fn close_menu_for(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        if self.ui.close_menu_for(tower) {
            out_events.push(Event::ContextMenuClosed);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is over only the clock keeps running; gameplay commands are
/// dropped without effect.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.game_over && command.affects_gameplay() {
        trace!(?command, "ignoring command after game over");
        return;
    }

    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.ui.age_status();
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StartWave => {
            let wave = world.economy.advance_wave();
            info!(wave, "wave started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy { wave, color } => {
            let stats = EnemyStats::for_wave(&world.config.enemies, wave);
            let enemy = world.enemies.spawn(world.path.start(), stats, color);
            trace!(enemy = enemy.get(), wave, "enemy spawned");
            out_events.push(Event::EnemySpawned { enemy, wave });
        }
        Command::AdvanceEnemies => {
            let mut departures = Vec::new();
            world.enemies.advance_all(&world.path, &mut departures);
            for departure in departures {
                match departure {
                    Departure::Escaped(enemy) => {
                        let lives = world.economy.lose_life();
                        debug!(enemy = enemy.get(), lives, "enemy escaped");
                        out_events.push(Event::EnemyEscaped { enemy, lives });
                    }
                    Departure::Killed(enemy, reward) => {
                        world.economy.earn(reward);
                        out_events.push(Event::EnemyKilled { enemy, reward });
                    }
                }
            }
        }
        Command::CoolTower { tower } => {
            if let Some(entry) = world.towers.get_mut(tower) {
                entry.cool();
            }
        }
        Command::FireAt { tower, target } => {
            let Some(entry) = world.towers.get_mut(tower) else {
                return;
            };
            if entry.cooldown_remaining > 0 {
                return;
            }
            let Some(enemy) = world.enemies.get_mut(target) else {
                return;
            };

            enemy.take_damage(entry.damage);
            entry.rearm();
            out_events.push(Event::TowerFired {
                tower,
                target,
                shot: ShotEffect {
                    from: entry.position,
                    to: enemy.position,
                },
            });
        }
        Command::ResolveGameOver => {
            if !world.game_over && world.economy.lives <= 0 {
                world.game_over = true;
                let wave = world.economy.wave;
                info!(wave, "game over");
                out_events.push(Event::GameOver { wave });
            }
        }
        Command::SelectTemplate { template } => {
            if world.config.template(template).is_some() {
                world.ui.selected_template = template;
                out_events.push(Event::TemplateSelected { template });
            } else {
                debug!(template = template.get(), "ignoring unknown template slot");
            }
        }
        Command::PlaceTower { template, position } => match world.place_tower(template, position) {
            Ok(tower) => {
                debug!(tower = tower.get(), x = position.x, y = position.y, "tower placed");
                out_events.push(Event::TowerPlaced {
                    tower,
                    template,
                    position,
                });
            }
            Err(reason) => {
                debug!(%reason, x = position.x, y = position.y, "placement rejected");
                world.show_status(reason.to_string());
                out_events.push(Event::TowerPlacementRejected {
                    template,
                    position,
                    reason,
                });
            }
        },
        Command::SellTower { tower } => {
            if world.towers.remove(tower).is_some() {
                let refund = world.config.economy.sell_refund;
                world.economy.earn(refund);
                debug!(tower = tower.get(), refund, "tower sold");
                out_events.push(Event::TowerSold { tower, refund });
            } else {
                debug!(tower = tower.get(), "sell requested for missing tower");
            }
            world.close_menu_for(tower, out_events);
        }
        Command::UpgradeTower { tower } => {
            match world.upgrade_tower(tower) {
                Ok(level) => {
                    debug!(tower = tower.get(), level, "tower upgraded");
                    world.show_status(format!("Tower upgraded to level {level}"));
                    out_events.push(Event::TowerUpgraded { tower, level });
                }
                Err(reason) => {
                    debug!(tower = tower.get(), %reason, "upgrade rejected");
                    world.show_status(reason.to_string());
                    out_events.push(Event::TowerUpgradeRejected { tower, reason });
                }
            }
            world.close_menu_for(tower, out_events);
        }
        Command::OpenContextMenu { tower, anchor } => {
            if world.towers.contains(tower) {
                let menu = ContextMenu { tower, anchor };
                world.ui.context_menu = Some(menu);
                out_events.push(Event::ContextMenuOpened { menu });
            }
        }
        Command::CloseContextMenu => {
            if world.ui.context_menu.take().is_some() {
                out_events.push(Event::ContextMenuClosed);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{StatusMessage, World};
    use lane_defence_core::{
        ContextMenu, EnemyView, GameConfig, PathModel, Point, TemplateIndex, TowerId, TowerView,
        UiView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Path enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &PathModel {
        &world.path
    }

    /// Captures a read-only view of every live enemy, including those whose
    /// health already dropped to zero during the current tick.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Number of enemies in the live set.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Currency available to the player.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.economy.currency
    }

    /// Lives left; may drop below zero when several enemies escape at once.
    #[must_use]
    pub fn lives(world: &World) -> i32 {
        world.economy.lives
    }

    /// Number of the current wave, zero before the first wave starts.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.economy.wave
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// UI state consulted by the input state machine.
    #[must_use]
    pub fn ui_view(world: &World) -> UiView {
        UiView {
            context_menu: world.ui.context_menu,
            selected_template: world.ui.selected_template,
            template_count: world.config.towers.len(),
        }
    }

    /// Currently open context menu.
    #[must_use]
    pub fn context_menu(world: &World) -> Option<ContextMenu> {
        world.ui.context_menu
    }

    /// Catalog slot used by placements.
    #[must_use]
    pub fn selected_template(world: &World) -> TemplateIndex {
        world.ui.selected_template
    }

    /// Visible status message, if any.
    #[must_use]
    pub fn status(world: &World) -> Option<&StatusMessage> {
        world.ui.status.as_ref()
    }

    /// First tower, in identifier order, within the pick radius of `point`.
    #[must_use]
    pub fn tower_at(world: &World, point: Point) -> Option<TowerId> {
        world
            .towers
            .within(point, world.config.placement.pick_radius)
            .map(|tower| tower.id)
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{Color, EnemyId};

    const OPEN_GROUND: Point = Point::new(350.0, 300.0);

    fn new_world() -> World {
        World::new(GameConfig::default()).expect("default configuration")
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn place_basic(world: &mut World, position: Point) -> TowerId {
        let events = run(
            world,
            Command::PlaceTower {
                template: TemplateIndex::new(0),
                position,
            },
        );
        match events.as_slice() {
            [Event::TowerPlaced { tower, .. }] => *tower,
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn new_world_uses_configured_balances() {
        let world = new_world();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::currency(&world), 300);
        assert_eq!(query::lives(&world), 20);
        assert_eq!(query::wave(&world), 0);
        assert!(!query::is_game_over(&world));
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = GameConfig {
            towers: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(World::new(config), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn tick_advances_clock_and_ages_status() {
        let mut world = new_world();
        world.show_status("hi".to_owned());
        let events = run(&mut world, Command::Tick);
        assert_eq!(events, vec![Event::TimeAdvanced { tick: 1 }]);
        assert_eq!(query::status(&world).map(StatusMessage::remaining_ticks), Some(89));
    }

    #[test]
    fn placement_debits_cost() {
        let mut world = new_world();
        let tower = place_basic(&mut world, OPEN_GROUND);
        assert_eq!(query::currency(&world), 220);
        assert_eq!(query::tower_at(&world, Point::new(360.0, 300.0)), Some(tower));
    }

    #[test]
    fn rejected_placement_shows_status_and_keeps_currency() {
        let mut world = new_world();
        let events = run(
            &mut world,
            Command::PlaceTower {
                template: TemplateIndex::new(0),
                position: Point::new(100.0, 350.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::OnRoad,
                ..
            }]
        ));
        assert_eq!(query::currency(&world), 300);
        assert_eq!(
            query::status(&world).map(StatusMessage::text),
            Some("Cannot build on the road!")
        );
    }

    #[test]
    fn unknown_template_is_rejected() {
        let mut world = new_world();
        let events = run(
            &mut world,
            Command::PlaceTower {
                template: TemplateIndex::new(9),
                position: OPEN_GROUND,
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::UnknownTemplate,
                ..
            }]
        ));
    }

    #[test]
    fn selling_refunds_fixed_amount_and_closes_menu() {
        let mut world = new_world();
        let tower = place_basic(&mut world, OPEN_GROUND);
        let _ = run(
            &mut world,
            Command::OpenContextMenu {
                tower,
                anchor: OPEN_GROUND,
            },
        );

        let events = run(&mut world, Command::SellTower { tower });
        assert_eq!(
            events,
            vec![
                Event::TowerSold { tower, refund: 50 },
                Event::ContextMenuClosed
            ]
        );
        assert_eq!(query::currency(&world), 270);
        assert!(query::tower_view(&world).is_empty());
        assert!(query::context_menu(&world).is_none());
    }

    #[test]
    fn upgrade_debits_cost_and_reports_level() {
        let mut world = new_world();
        let tower = place_basic(&mut world, OPEN_GROUND);
        let events = run(&mut world, Command::UpgradeTower { tower });
        assert_eq!(events, vec![Event::TowerUpgraded { tower, level: 2 }]);
        assert_eq!(query::currency(&world), 160);
        assert_eq!(
            query::status(&world).map(StatusMessage::text),
            Some("Tower upgraded to level 2")
        );
    }

    #[test]
    fn upgrade_without_funds_is_rejected_without_change() {
        let mut world = new_world();
        let tower = place_basic(&mut world, OPEN_GROUND);
        let _ = place_basic(&mut world, Point::new(350.0, 400.0));
        let _ = place_basic(&mut world, Point::new(700.0, 300.0));
        assert_eq!(query::currency(&world), 60);
        world.economy.currency = 59;

        let events = run(&mut world, Command::UpgradeTower { tower });
        assert_eq!(
            events,
            vec![Event::TowerUpgradeRejected {
                tower,
                reason: UpgradeError::InsufficientFunds {
                    cost: 60,
                    available: 59
                }
            }]
        );
        assert_eq!(query::currency(&world), 59);
        let level = query::tower_view(&world).iter().next().map(|t| t.level);
        assert_eq!(level, Some(1));
    }

    #[test]
    fn upgrade_beyond_level_five_is_rejected() {
        let mut world = new_world();
        let tower = place_basic(&mut world, OPEN_GROUND);
        world.economy.currency = 10_000;
        for _ in 0..4 {
            let _ = run(&mut world, Command::UpgradeTower { tower });
        }
        let events = run(&mut world, Command::UpgradeTower { tower });
        assert_eq!(
            events,
            vec![Event::TowerUpgradeRejected {
                tower,
                reason: UpgradeError::MaxLevel
            }]
        );
        assert_eq!(
            query::status(&world).map(StatusMessage::text),
            Some("Maximum level!")
        );
    }

    #[test]
    fn fire_rearms_tower_and_damages_enemy() {
        let mut world = new_world();
        let tower = place_basic(&mut world, Point::new(60.0, 300.0));
        let _ = run(&mut world, Command::StartWave);
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                wave: 1,
                color: Color::from_rgb(0, 0, 0),
            },
        );
        let enemy = EnemyId::new(0);

        let events = run(
            &mut world,
            Command::FireAt {
                tower,
                target: enemy,
            },
        );
        assert_eq!(
            events,
            vec![Event::TowerFired {
                tower,
                target: enemy,
                shot: ShotEffect {
                    from: Point::new(60.0, 300.0),
                    to: Point::new(0.0, 350.0),
                },
            }]
        );
        let snapshot = *query::enemy_view(&world).iter().next().expect("enemy");
        assert_eq!(snapshot.health, 50);
        let tower_snapshot = *query::tower_view(&world).iter().next().expect("tower");
        assert_eq!(tower_snapshot.cooldown_remaining, 25);

        assert!(run(&mut world, Command::FireAt { tower, target: enemy }).is_empty());
        let _ = run(&mut world, Command::CoolTower { tower });
        let tower_snapshot = *query::tower_view(&world).iter().next().expect("tower");
        assert_eq!(tower_snapshot.cooldown_remaining, 24);
    }

    #[test]
    fn game_over_triggers_once_and_freezes_gameplay() {
        let mut world = new_world();
        world.economy.lives = 0;

        assert_eq!(
            run(&mut world, Command::ResolveGameOver),
            vec![Event::GameOver { wave: 0 }]
        );
        assert!(run(&mut world, Command::ResolveGameOver).is_empty());

        let events = run(
            &mut world,
            Command::PlaceTower {
                template: TemplateIndex::new(0),
                position: OPEN_GROUND,
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::currency(&world), 300);
        assert_eq!(
            run(&mut world, Command::Tick),
            vec![Event::TimeAdvanced { tick: 1 }]
        );
    }

    #[test]
    fn context_menu_requires_live_tower() {
        let mut world = new_world();
        let events = run(
            &mut world,
            Command::OpenContextMenu {
                tower: TowerId::new(3),
                anchor: OPEN_GROUND,
            },
        );
        assert!(events.is_empty());
        assert!(run(&mut world, Command::CloseContextMenu).is_empty());
    }
}
