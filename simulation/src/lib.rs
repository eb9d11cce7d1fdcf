#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven clock that runs the pure systems against the world in a
//! fixed order once per tick.

use std::fmt;

use lane_defence_core::{Command, ConfigError, Event, GameConfig, PointerSample, TowerTarget};
use lane_defence_system_input::{InputStateMachine, PointerFrame, PointerTracker};
use lane_defence_system_tower_combat::TowerCombat;
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_system_waves::{ColorChooser, WaveScheduler};
use lane_defence_world::{self as world, query, World};
use tracing::info;

/// Owns the world together with every system and runs them tick by tick.
pub struct Simulation {
    world: World,
    waves: WaveScheduler,
    colors: Box<dyn ColorChooser>,
    tracker: PointerTracker,
    input: InputStateMachine,
    targeting: TowerTargeting,
    combat: TowerCombat,
    pointer: PointerFrame,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    events: Vec<Event>,
    running: bool,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("waves", &self.waves)
            .field("pointer", &self.pointer)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a running simulation for a fresh session.
    pub fn new(config: GameConfig, colors: Box<dyn ColorChooser>) -> Result<Self, ConfigError> {
        let waves = WaveScheduler::new(config.waves.clone(), config.enemies.palette.clone());
        let input = InputStateMachine::new(config.layout.clone());
        Ok(Self {
            world: World::new(config)?,
            waves,
            colors,
            tracker: PointerTracker::new(),
            input,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            pointer: PointerFrame::default(),
            commands: Vec::new(),
            targets: Vec::new(),
            events: Vec::new(),
            running: true,
        })
    }

    /// Advances the session by one tick using the sampled pointer state.
    ///
    /// After the game is over only the clock and the pointer tracker keep
    /// running. A halted simulation ignores the call.
    pub fn tick(&mut self, sample: PointerSample) {
        if !self.running {
            return;
        }
        self.events.clear();

        world::apply(&mut self.world, Command::Tick, &mut self.events);
        self.pointer = self.tracker.observe(sample);
        if query::is_game_over(&self.world) {
            return;
        }

        self.waves.handle(
            query::live_enemy_count(&self.world),
            self.colors.as_mut(),
            &mut self.commands,
        );
        self.flush_commands();

        let state = &self.world;
        self.input.handle(
            self.pointer,
            query::ui_view(state),
            |point| query::tower_at(state, point),
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(&mut self.world, Command::AdvanceEnemies, &mut self.events);

        let towers = query::tower_view(&self.world);
        self.targeting.handle(&towers, &query::enemy_view(&self.world), &mut self.targets);
        self.combat.handle(&towers, &self.targets, &mut self.commands);
        self.flush_commands();

        world::apply(&mut self.world, Command::ResolveGameOver, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Stops the simulation at the next tick boundary.
    pub fn halt(&mut self) {
        if self.running {
            info!(tick = query::tick_index(&self.world), "simulation halted");
        }
        self.running = false;
    }

    /// Reports whether the simulation still accepts ticks.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Authoritative world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the last tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Pointer state observed during the last tick.
    #[must_use]
    pub const fn pointer(&self) -> PointerFrame {
        self.pointer
    }
}
