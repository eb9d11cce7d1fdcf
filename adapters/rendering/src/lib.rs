#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lane Defence adapters.
//!
//! A [`Frame`] captures everything a renderer needs for one tick. It is
//! rebuilt from the world after every tick and only lives for the duration
//! of a single [`Renderer::render`] call.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lane_defence_core::{
    ContextMenu, EnemyId, Event, Point, Rect, TemplateIndex, TowerId, UiLayout,
};
use lane_defence_world::{query, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            1.0,
        )
    }
}

impl From<lane_defence_core::Color> for Color {
    fn from(color: lane_defence_core::Color) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Converts a board point into renderer coordinates.
#[must_use]
pub fn to_vec2(point: Point) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

/// Enemy drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Center of the enemy body.
    pub position: Vec2,
    /// Fill color of the body.
    pub color: Color,
    /// Remaining health in the range 0.0..=1.0, used for the health bar.
    pub health_ratio: f32,
}

/// Tower drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Center of the tower.
    pub position: Vec2,
    /// Attack radius, drawn while the tower is highlighted.
    pub range: f32,
    /// Fill color inherited from the template.
    pub color: Color,
    /// Current level.
    pub level: u32,
    /// Set when the pointer hovers the tower or its context menu is open.
    pub highlighted: bool,
}

/// Beam from a tower to the enemy it hit during the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotPresentation {
    /// Tower that fired.
    pub tower: TowerId,
    /// Start of the beam.
    pub from: Vec2,
    /// End of the beam.
    pub to: Vec2,
}

/// Heads-up display counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Currency available to the player.
    pub currency: u32,
    /// Lives left.
    pub lives: i32,
    /// Current wave number.
    pub wave: u32,
}

/// Template slot shown in the bottom panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSlot<'a> {
    /// Catalog position of the template.
    pub template: TemplateIndex,
    /// Display name.
    pub name: &'a str,
    /// Placement cost.
    pub cost: u32,
    /// Template color.
    pub color: Color,
    /// Area covered by the slot.
    pub bounds: Rect,
    /// Set for the template used by placements.
    pub selected: bool,
}

/// Status message line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine<'a> {
    /// Text to display.
    pub text: &'a str,
    /// Ticks left before the message disappears.
    pub remaining_ticks: u32,
}

/// Open context menu with its option labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuPresentation {
    /// Tower the menu acts upon.
    pub tower: TowerId,
    /// Region of the sell option.
    pub sell: Rect,
    /// Region of the upgrade option.
    pub upgrade: Rect,
    /// Currency returned when selling.
    pub sell_refund: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: u32,
}

/// Everything a renderer draws for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    /// Board and panel layout.
    pub layout: &'a UiLayout,
    /// Road waypoints in travel order.
    pub path: Vec<Vec2>,
    /// Live enemies in identifier order.
    pub enemies: Vec<EnemyPresentation>,
    /// Placed towers in identifier order.
    pub towers: Vec<TowerPresentation>,
    /// Attacks resolved during the tick.
    pub shots: Vec<ShotPresentation>,
    /// Counters shown at the top of the board.
    pub hud: Hud,
    /// Template selection panel.
    pub panel: Vec<PanelSlot<'a>>,
    /// Visible status message, if any.
    pub status: Option<StatusLine<'a>>,
    /// Open context menu, if any. Hidden once the game is over.
    pub context_menu: Option<MenuPresentation>,
    /// Set once the session reached its terminal state.
    pub game_over: bool,
}

impl<'a> Frame<'a> {
    /// Captures the world state after a tick.
    ///
    /// `events` are the events of that tick and provide the shot effects;
    /// `pointer` drives the hover highlight.
    #[must_use]
    pub fn capture(world: &'a World, events: &[Event], pointer: Point) -> Self {
        let config = query::config(world);
        let layout = &config.layout;
        let game_over = query::is_game_over(world);
        let menu = query::context_menu(world).filter(|_| !game_over);
        let hovered = query::tower_at(world, pointer);
        let tower_view = query::tower_view(world);

        let towers = tower_view
            .iter()
            .map(|tower| TowerPresentation {
                id: tower.id,
                position: to_vec2(tower.position),
                range: tower.range as f32,
                color: tower.color.into(),
                level: tower.level,
                highlighted: hovered == Some(tower.id)
                    || menu.is_some_and(|menu| menu.tower == tower.id),
            })
            .collect();

        let enemies = query::enemy_view(world)
            .iter()
            .map(|enemy| EnemyPresentation {
                id: enemy.id,
                position: to_vec2(enemy.position),
                color: enemy.color.into(),
                health_ratio: enemy.health_ratio() as f32,
            })
            .collect();

        let shots = events
            .iter()
            .filter_map(|event| match event {
                Event::TowerFired { tower, shot, .. } => Some(ShotPresentation {
                    tower: *tower,
                    from: to_vec2(shot.from),
                    to: to_vec2(shot.to),
                }),
                _ => None,
            })
            .collect();

        let selected = query::selected_template(world);
        let panel_top = layout.height - layout.panel_height;
        let panel = config
            .towers
            .iter()
            .enumerate()
            .map(|(slot, template)| PanelSlot {
                template: TemplateIndex::new(slot),
                name: &template.name,
                cost: template.cost,
                color: template.color.into(),
                bounds: Rect::new(
                    Point::new(slot as f64 * layout.slot_width, panel_top),
                    layout.slot_width,
                    layout.panel_height,
                ),
                selected: selected.get() == slot,
            })
            .collect();

        let status = query::status(world).map(|status| StatusLine {
            text: status.text(),
            remaining_ticks: status.remaining_ticks(),
        });

        let context_menu = menu.and_then(|menu| {
            let upgrade_cost = tower_view
                .iter()
                .find(|tower| tower.id == menu.tower)?
                .upgrade_cost;
            Some(menu_presentation(
                menu,
                layout,
                config.economy.sell_refund,
                upgrade_cost,
            ))
        });

        Self {
            layout,
            path: query::path(world).waypoints().iter().copied().map(to_vec2).collect(),
            enemies,
            towers,
            shots,
            hud: Hud {
                currency: query::currency(world),
                lives: query::lives(world),
                wave: query::wave(world),
            },
            panel,
            status,
            context_menu,
            game_over,
        }
    }
}

fn menu_presentation(
    menu: ContextMenu,
    layout: &UiLayout,
    sell_refund: u32,
    upgrade_cost: u32,
) -> MenuPresentation {
    MenuPresentation {
        tower: menu.tower,
        sell: menu.sell_region(layout),
        upgrade: menu.upgrade_region(layout),
        sell_refund,
        upgrade_cost,
    }
}

/// Sink that presents one frame per tick.
pub trait Renderer {
    /// Draws the provided frame. The frame must not be retained.
    fn render(&mut self, frame: &Frame<'_>) -> AnyResult<()>;
}
