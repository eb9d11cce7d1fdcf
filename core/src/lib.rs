#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots
//! and respond with [`Command`] values, the world executes those commands
//! via its `apply` entry point and reports the outcome as [`Event`] values.
//! Nothing in here mutates state on its own.

pub mod config;
pub mod geometry;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    EconomyRules, EnemyBalance, GameConfig, PlacementRules, TowerTemplate, UiLayout,
    UpgradeRules, WaveBalance,
};
pub use geometry::{PathModel, Point, Rect};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the tick counter and ages the status message.
    Tick,
    /// Starts the next wave, incrementing the wave counter.
    StartWave,
    /// Creates an enemy at the start of the path with stats for `wave`.
    SpawnEnemy {
        /// Wave whose stats the enemy receives.
        wave: u32,
        /// Cosmetic color chosen for the enemy.
        color: Color,
    },
    /// Moves every live enemy one tick along the path and culls finished ones.
    AdvanceEnemies,
    /// Consumes one tick of a tower's cooldown.
    CoolTower {
        /// Tower whose cooldown elapses.
        tower: TowerId,
    },
    /// Resolves an attack from a ready tower against a chosen enemy.
    FireAt {
        /// Tower performing the attack.
        tower: TowerId,
        /// Enemy receiving the damage.
        target: EnemyId,
    },
    /// Enters the terminal state when no lives remain.
    ResolveGameOver,
    /// Selects the template used by subsequent placements.
    SelectTemplate {
        /// Catalog slot to select.
        template: TemplateIndex,
    },
    /// Requests placement of a tower from the catalog at a position.
    PlaceTower {
        /// Catalog slot describing the tower.
        template: TemplateIndex,
        /// Desired tower center.
        position: Point,
    },
    /// Sells a tower for the fixed refund.
    SellTower {
        /// Tower to remove.
        tower: TowerId,
    },
    /// Attempts to raise a tower by one level.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Opens the context menu for a tower.
    OpenContextMenu {
        /// Tower the menu acts upon.
        tower: TowerId,
        /// Upper-left corner of the menu.
        anchor: Point,
    },
    /// Closes the context menu if one is open.
    CloseContextMenu,
}

impl Command {
    /// Reports whether the command changes gameplay state, as opposed to the
    /// clock and cosmetic status that keep running after the game ends.
    #[must_use]
    pub const fn affects_gameplay(&self) -> bool {
        !matches!(self, Self::Tick | Self::ResolveGameOver)
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
    /// Announces that a new wave began.
    WaveStarted {
        /// Number of the wave that began.
        wave: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// Reports that an enemy completed the path and cost a life.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the loss.
        lives: i32,
    },
    /// Reports that an enemy died and paid out its reward.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Currency granted.
        reward: u32,
    },
    /// Reports a tower attack, carrying the one-shot visual effect.
    TowerFired {
        /// Tower that attacked.
        tower: TowerId,
        /// Enemy that was hit.
        target: EnemyId,
        /// Beam drawn for this tick only.
        shot: ShotEffect,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Catalog slot the tower was built from.
        template: TemplateIndex,
        /// Tower center.
        position: Point,
    },
    /// Reports that a placement request was rejected.
    TowerPlacementRejected {
        /// Catalog slot requested for placement.
        template: TemplateIndex,
        /// Position provided in the request.
        position: Point,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Currency refunded.
        refund: u32,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower targeted by the upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a catalog slot was selected.
    TemplateSelected {
        /// Slot now selected.
        template: TemplateIndex,
    },
    /// Confirms that the context menu opened.
    ContextMenuOpened {
        /// Menu state after opening.
        menu: ContextMenu,
    },
    /// Confirms that the context menu closed.
    ContextMenuClosed,
    /// Announces the terminal state.
    GameOver {
        /// Wave reached when the last life was lost.
        wave: u32,
    },
}

/// Opaque RGB color used by entities and templates.
///
/// Serialized as a `#rrggbb` string. The default is black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor {
            value: value.to_owned(),
        };
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position of a template within the configured catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateIndex(usize);

impl TemplateIndex {
    /// Wraps a catalog position.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Catalog position as a plain index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Enemy stats derived from the wave number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Distance travelled per tick.
    pub speed: f64,
    /// Health at creation.
    pub max_health: i32,
    /// Currency granted on death.
    pub reward: u32,
}

impl EnemyStats {
    /// Derives stats for a 1-indexed wave.
    ///
    /// Speed and health compound multiplicatively per wave while the reward
    /// grows linearly.
    #[must_use]
    pub fn for_wave(balance: &EnemyBalance, wave: u32) -> Self {
        let exponent = f64::from(wave.saturating_sub(1));
        let speed = balance.base_speed * balance.speed_growth.powf(exponent);
        let health = balance.base_health * balance.health_growth.powf(exponent);
        let health = config::floor_to_u32(health);
        let reward = balance
            .base_reward
            .saturating_add(balance.reward_per_wave.saturating_mul(wave));

        Self {
            speed,
            max_health: i32::try_from(health).unwrap_or(i32::MAX),
            reward,
        }
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position on the board.
    pub position: Point,
    /// Index of the waypoint the enemy is heading to.
    pub target_waypoint: usize,
    /// Remaining health; zero or below means dead.
    pub health: i32,
    /// Health at creation.
    pub max_health: i32,
    /// Appearance assigned to the enemy.
    pub color: Color,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the maximum, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (f64::from(self.health) / f64::from(self.max_health)).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Catalog slot the tower was built from.
    pub template: TemplateIndex,
    /// Tower center.
    pub position: Point,
    /// Attack radius.
    pub range: u32,
    /// Damage per attack.
    pub damage: u32,
    /// Ticks left before the tower may attack again.
    pub cooldown_remaining: u32,
    /// Ticks between two attacks.
    pub cooldown_max: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: u32,
    /// Color inherited from the template.
    pub color: Color,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Enemy chosen by a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that selected the enemy.
    pub tower: TowerId,
    /// Enemy the tower would attack.
    pub enemy: EnemyId,
    /// Tower center.
    pub tower_position: Point,
    /// Enemy position when selected.
    pub enemy_position: Point,
}

/// Transient beam drawn from a tower to the enemy it hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotEffect {
    /// Tower center.
    pub from: Point,
    /// Enemy position at the instant of firing.
    pub to: Point,
}

/// Context menu bound to one live tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
    /// Tower the menu acts upon.
    pub tower: TowerId,
    /// Upper-left corner of the menu.
    pub anchor: Point,
}

impl ContextMenu {
    /// Region that sells the tower when clicked.
    #[must_use]
    pub fn sell_region(&self, layout: &UiLayout) -> Rect {
        Rect::new(self.anchor, layout.menu_width, layout.menu_option_height)
    }

    /// Region that upgrades the tower when clicked.
    #[must_use]
    pub fn upgrade_region(&self, layout: &UiLayout) -> Rect {
        let origin = Point::new(self.anchor.x, self.anchor.y + layout.menu_option_height);
        Rect::new(origin, layout.menu_width, layout.menu_option_height)
    }

    /// Full extent of the menu.
    #[must_use]
    pub fn bounds(&self, layout: &UiLayout) -> Rect {
        Rect::new(self.anchor, layout.menu_width, layout.menu_option_height * 2.0)
    }
}

/// UI state consulted by the input state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UiView {
    /// Currently open context menu, if any.
    pub context_menu: Option<ContextMenu>,
    /// Catalog slot used by placements.
    pub selected_template: TemplateIndex,
    /// Number of templates in the catalog.
    pub template_count: usize,
}

/// Level and edge of a single button, recomputed once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonState {
    /// Button is held during this tick.
    pub pressed: bool,
    /// Button went down since the previous tick.
    pub just_pressed: bool,
}

impl ButtonState {
    /// Derives the state from the previous and current button levels.
    #[must_use]
    pub const fn from_levels(previous: bool, current: bool) -> Self {
        Self {
            pressed: current,
            just_pressed: current && !previous,
        }
    }
}

/// Raw pointer sample taken once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// Pointer location in board coordinates.
    pub position: Point,
    /// Level of the primary button.
    pub primary_down: bool,
    /// Level of the secondary button.
    pub secondary_down: bool,
}

impl PointerSample {
    /// Sample with both buttons released.
    #[must_use]
    pub const fn idle(position: Point) -> Self {
        Self {
            position,
            primary_down: false,
            secondary_down: false,
        }
    }
}

/// Source of pointer samples, polled once per tick before input handling.
pub trait InputSource {
    /// Returns the pointer state for the upcoming tick.
    fn sample(&mut self) -> PointerSample;
}

/// Reasons a tower placement request may be rejected by the world.
///
/// The display text is shown to the player as a status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The player cannot afford the template.
    #[error("Not enough money!")]
    InsufficientFunds {
        /// Price of the template.
        cost: u32,
        /// Currency available at the time of the request.
        available: u32,
    },
    /// The point lies within the road clearance.
    #[error("Cannot build on the road!")]
    OnRoad,
    /// The point lies within the minimum separation of another tower.
    #[error("Too close to another tower!")]
    TooCloseToTower,
    /// The requested template does not exist in the catalog.
    #[error("Unknown tower type!")]
    UnknownTemplate,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum UpgradeError {
    /// The tower already reached the terminal level.
    #[error("Maximum level!")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("Not enough money to upgrade!")]
    InsufficientFunds {
        /// Price of the upgrade.
        cost: u32,
        /// Currency available at the time of the request.
        available: u32,
    },
    /// The tower no longer exists.
    #[error("Tower no longer exists!")]
    MissingTower,
}

/// Reasons a waypoint sequence cannot form a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// Fewer than two waypoints were provided.
    #[error("path needs at least two waypoints (received {count})")]
    TooFewWaypoints {
        /// Number of waypoints provided.
        count: usize,
    },
    /// A waypoint repeats its predecessor.
    #[error("waypoint {index} repeats the previous waypoint")]
    RepeatedWaypoint {
        /// Index of the repeated waypoint.
        index: usize,
    },
}

/// Problems detected while validating a [`GameConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The path is malformed.
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
    /// The tower catalog holds no template.
    #[error("tower catalog is empty")]
    EmptyCatalog,
    /// The enemy palette holds no color.
    #[error("enemy palette is empty")]
    EmptyPalette,
    /// A value that must be positive is not.
    #[error("`{field}` must be positive")]
    NotPositive {
        /// Configuration key holding the value.
        field: &'static str,
    },
    /// A color string is not of the `#rrggbb` form.
    #[error("invalid color `{value}`, expected #rrggbb")]
    InvalidColor {
        /// Rejected input.
        value: String,
    },
}
