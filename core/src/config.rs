//! Static configuration loaded once per session.
//!
//! Every section implements [`Default`] with the standard balance, and all
//! sections are `#[serde(default)]` so partial configuration files only
//! override what they name.

use serde::{Deserialize, Serialize};

use crate::{Color, ConfigError, PathModel, Point, TemplateIndex};

/// Complete set of configuration inputs consumed by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Waypoints of the enemy path, in travel order.
    pub path: Vec<Point>,
    /// Catalog of tower templates offered in the selection panel.
    pub towers: Vec<TowerTemplate>,
    /// Starting balances and refunds.
    pub economy: EconomyRules,
    /// Enemy base stats and their per-wave growth.
    pub enemies: EnemyBalance,
    /// Wave sizing and spawn pacing.
    pub waves: WaveBalance,
    /// Tower upgrade scaling.
    pub upgrades: UpgradeRules,
    /// Distances governing placement and tower picking.
    pub placement: PlacementRules,
    /// Screen layout of the panel and context menu.
    pub layout: UiLayout,
}

impl GameConfig {
    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.path_model()?;

        if self.towers.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.enemies.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        for template in &self.towers {
            if template.cooldown == 0 {
                return Err(ConfigError::NotPositive {
                    field: "towers.cooldown",
                });
            }
        }

        ensure_positive("enemies.base_speed", self.enemies.base_speed)?;
        ensure_positive("enemies.speed_growth", self.enemies.speed_growth)?;
        ensure_positive("enemies.health_growth", self.enemies.health_growth)?;
        ensure_positive("waves.spawn_delay_decay", self.waves.spawn_delay_decay)?;
        ensure_positive("layout.slot_width", self.layout.slot_width)?;
        Ok(())
    }

    /// Builds the validated path model described by [`GameConfig::path`].
    pub fn path_model(&self) -> Result<PathModel, ConfigError> {
        Ok(PathModel::new(self.path.clone())?)
    }

    /// Template stored at the provided catalog index, if any.
    #[must_use]
    pub fn template(&self, index: TemplateIndex) -> Option<&TowerTemplate> {
        self.towers.get(index.get())
    }
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            path: vec![
                Point::new(0.0, 350.0),
                Point::new(200.0, 350.0),
                Point::new(200.0, 150.0),
                Point::new(500.0, 150.0),
                Point::new(500.0, 550.0),
                Point::new(850.0, 550.0),
                Point::new(850.0, 280.0),
                Point::new(1100.0, 280.0),
            ],
            towers: default_catalog(),
            economy: EconomyRules::default(),
            enemies: EnemyBalance::default(),
            waves: WaveBalance::default(),
            upgrades: UpgradeRules::default(),
            placement: PlacementRules::default(),
            layout: UiLayout::default(),
        }
    }
}

/// Named tower archetype defining base stats and placement cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTemplate {
    /// Display name shown in the selection panel.
    pub name: String,
    /// Currency debited when the tower is placed.
    pub cost: u32,
    /// Attack radius in world units.
    pub range: u32,
    /// Health removed from the target per attack.
    pub damage: u32,
    /// Ticks between two attacks.
    pub cooldown: u32,
    /// Color used when drawing the tower.
    pub color: Color,
    /// Price of the first upgrade.
    pub upgrade_cost: u32,
    /// Factor applied to damage on every upgrade.
    pub upgrade_multiplier: f64,
}

fn default_catalog() -> Vec<TowerTemplate> {
    vec![
        TowerTemplate {
            name: "Basic".to_owned(),
            cost: 80,
            range: 120,
            damage: 10,
            cooldown: 25,
            color: Color::from_rgb(0x50, 0x8c, 0xff),
            upgrade_cost: 60,
            upgrade_multiplier: 1.5,
        },
        TowerTemplate {
            name: "Rapid".to_owned(),
            cost: 140,
            range: 100,
            damage: 6,
            cooldown: 8,
            color: Color::from_rgb(0x3c, 0xdc, 0x78),
            upgrade_cost: 90,
            upgrade_multiplier: 1.5,
        },
        TowerTemplate {
            name: "Heavy".to_owned(),
            cost: 220,
            range: 150,
            damage: 22,
            cooldown: 40,
            color: Color::from_rgb(0xe6, 0x3c, 0x3c),
            upgrade_cost: 130,
            upgrade_multiplier: 1.6,
        },
    ]
}

/// Starting balances and fixed refunds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Currency available when the session starts.
    pub starting_currency: u32,
    /// Lives available when the session starts.
    pub starting_lives: i32,
    /// Currency refunded when a tower is sold, regardless of its level.
    pub sell_refund: u32,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            starting_currency: 300,
            starting_lives: 20,
            sell_refund: 50,
        }
    }
}

/// Enemy base stats and compounding growth per wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyBalance {
    /// Health of a first-wave enemy.
    pub base_health: f64,
    /// Factor applied to health for every wave after the first.
    pub health_growth: f64,
    /// Distance travelled per tick by a first-wave enemy.
    pub base_speed: f64,
    /// Factor applied to speed for every wave after the first.
    pub speed_growth: f64,
    /// Reward component independent of the wave.
    pub base_reward: u32,
    /// Reward added per wave number.
    pub reward_per_wave: u32,
    /// Colors an enemy may be drawn with.
    pub palette: Vec<Color>,
}

impl Default for EnemyBalance {
    fn default() -> Self {
        Self {
            base_health: 60.0,
            health_growth: 1.18,
            base_speed: 1.2,
            speed_growth: 1.03,
            base_reward: 12,
            reward_per_wave: 2,
            palette: vec![
                Color::from_rgb(0x50, 0x8c, 0xff),
                Color::from_rgb(0x50, 0xdc, 0xdc),
                Color::from_rgb(0xb4, 0x50, 0xdc),
            ],
        }
    }
}

/// Wave sizing and spawn cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveBalance {
    /// Enemies in a wave before the per-wave increment.
    pub base_size: u32,
    /// Additional enemies per wave number.
    pub size_per_wave: u32,
    /// Spawn delay, in ticks, before decay is applied.
    pub base_spawn_delay: u32,
    /// Factor applied to the spawn delay for every wave.
    pub spawn_delay_decay: f64,
    /// Lower bound of the spawn delay in ticks.
    pub min_spawn_delay: u32,
}

impl WaveBalance {
    /// Number of enemies spawned during `wave`.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.base_size.saturating_add(self.size_per_wave.saturating_mul(wave))
    }

    /// Ticks between two spawns during `wave`.
    #[must_use]
    pub fn spawn_delay(&self, wave: u32) -> u32 {
        let decay = self.spawn_delay_decay.powf(f64::from(wave));
        floor_to_u32(f64::from(self.base_spawn_delay) * decay).max(self.min_spawn_delay)
    }
}

impl Default for WaveBalance {
    fn default() -> Self {
        Self {
            base_size: 8,
            size_per_wave: 2,
            base_spawn_delay: 40,
            spawn_delay_decay: 0.97,
            min_spawn_delay: 12,
        }
    }
}

/// Scaling applied to a tower on every upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeRules {
    /// Terminal tower level.
    pub max_level: u32,
    /// Factor applied to range.
    pub range_growth: f64,
    /// Factor applied to the cooldown.
    pub cooldown_decay: f64,
    /// Lower bound of the cooldown in ticks.
    pub min_cooldown: u32,
    /// Factor applied to the price of the next upgrade.
    pub cost_growth: f64,
}

impl Default for UpgradeRules {
    fn default() -> Self {
        Self {
            max_level: 5,
            range_growth: 1.08,
            cooldown_decay: 0.9,
            min_cooldown: 4,
            cost_growth: 1.4,
        }
    }
}

/// Distances used when placing and picking towers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Towers may not be placed closer than this to the path.
    pub road_clearance: f64,
    /// Towers may not be placed closer than this to one another.
    pub tower_separation: f64,
    /// Radius around a tower that counts as pointing at it.
    pub pick_radius: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            road_clearance: 40.0,
            tower_separation: 40.0,
            pick_radius: 20.0,
        }
    }
}

/// Screen layout shared by the input state machine and renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiLayout {
    /// Board width in world units.
    pub width: f64,
    /// Board height in world units.
    pub height: f64,
    /// Height of the template selection band at the bottom of the board.
    pub panel_height: f64,
    /// Width of a single template slot in the panel.
    pub slot_width: f64,
    /// Width of the tower context menu.
    pub menu_width: f64,
    /// Height of each context menu option.
    pub menu_option_height: f64,
    /// Ticks a status message stays visible.
    pub status_ticks: u32,
}

impl UiLayout {
    /// Reports whether a point falls inside the bottom selection panel.
    #[must_use]
    pub fn in_panel(&self, point: Point) -> bool {
        point.y > self.height - self.panel_height
    }

    /// Panel slot below the provided point, ignoring catalog bounds.
    #[must_use]
    pub fn slot_at(&self, point: Point) -> Option<usize> {
        let slot = (point.x / self.slot_width).floor();
        if slot < 0.0 {
            return None;
        }
        Some(slot as usize)
    }
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 700.0,
            panel_height: 100.0,
            slot_width: 160.0,
            menu_width: 120.0,
            menu_option_height: 30.0,
            status_ticks: 90,
        }
    }
}

/// Floors a non-negative quantity into an integer stat.
#[must_use]
pub fn floor_to_u32(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.floor().min(f64::from(u32::MAX)) as u32
    }
}
