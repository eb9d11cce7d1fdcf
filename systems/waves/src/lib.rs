#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling system responsible for starting waves and pacing enemy
//! spawns.

use lane_defence_core::{Color, Command, WaveBalance};
use rand::{seq::SliceRandom, Rng};

/// Source of the cosmetic color given to every spawned enemy.
pub trait ColorChooser {
    /// Picks one color from `palette`, or `None` when the palette is empty.
    fn choose(&mut self, palette: &[Color]) -> Option<Color>;
}

/// Chooser drawing colors uniformly with the wrapped random number generator.
#[derive(Debug)]
pub struct RandomColors<R> {
    rng: R,
}

impl<R: Rng> RandomColors<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ColorChooser for RandomColors<R> {
    fn choose(&mut self, palette: &[Color]) -> Option<Color> {
        palette.choose(&mut self.rng).copied()
    }
}

/// Pure system that starts a wave once the board is clear and spawns its
/// enemies at a fixed cadence.
#[derive(Debug)]
pub struct WaveScheduler {
    balance: WaveBalance,
    palette: Vec<Color>,
    wave: u32,
    remaining_to_spawn: u32,
    ticks_since_spawn: u32,
    spawn_delay: u32,
}

impl WaveScheduler {
    /// Creates a scheduler that has not started any wave yet.
    #[must_use]
    pub fn new(balance: WaveBalance, palette: Vec<Color>) -> Self {
        let spawn_delay = balance.base_spawn_delay;
        Self {
            balance,
            palette,
            wave: 0,
            remaining_to_spawn: 0,
            ticks_since_spawn: 0,
            spawn_delay,
        }
    }

    /// Emits the wave and spawn commands for one tick.
    ///
    /// `live_enemies` is the size of the world's live enemy set before any
    /// command of this tick is applied.
    pub fn handle(
        &mut self,
        live_enemies: usize,
        colors: &mut dyn ColorChooser,
        out: &mut Vec<Command>,
    ) {
        if self.remaining_to_spawn == 0 && live_enemies == 0 {
            self.start_next_wave();
            out.push(Command::StartWave);
        }

        self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(1);
        if self.remaining_to_spawn > 0 && self.ticks_since_spawn >= self.spawn_delay {
            let color = colors.choose(&self.palette).unwrap_or_default();
            out.push(Command::SpawnEnemy {
                wave: self.wave,
                color,
            });
            self.remaining_to_spawn -= 1;
            self.ticks_since_spawn = 0;
        }
    }

    fn start_next_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.remaining_to_spawn = self.balance.enemy_count(self.wave);
        self.spawn_delay = self.balance.spawn_delay(self.wave);
        self.ticks_since_spawn = 0;
    }

    /// Wave the scheduler is currently spawning.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies of the current wave still waiting to enter the board.
    #[must_use]
    pub const fn remaining_to_spawn(&self) -> u32 {
        self.remaining_to_spawn
    }

    /// Ticks between two spawns in the current wave.
    #[must_use]
    pub const fn spawn_delay(&self) -> u32 {
        self.spawn_delay
    }
}
