#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating pointer samples into placement, selection
//! and context menu commands.

use lane_defence_core::{
    ButtonState, Command, Point, PointerSample, TemplateIndex, TowerId, UiLayout, UiView,
};

/// Pointer state for one tick with edges already derived.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerFrame {
    /// Pointer location in board coordinates.
    pub position: Point,
    /// Primary button state.
    pub primary: ButtonState,
    /// Secondary button state.
    pub secondary: ButtonState,
}

impl PointerFrame {
    /// Reports whether either button went down this tick.
    #[must_use]
    pub const fn has_click(&self) -> bool {
        self.primary.just_pressed || self.secondary.just_pressed
    }
}

/// Remembers the previous button levels so presses are reported once.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    primary_down: bool,
    secondary_down: bool,
}

impl PointerTracker {
    /// Creates a tracker with both buttons released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary_down: false,
            secondary_down: false,
        }
    }

    /// Derives the frame for `sample` and stores its levels for the next tick.
    pub fn observe(&mut self, sample: PointerSample) -> PointerFrame {
        let frame = PointerFrame {
            position: sample.position,
            primary: ButtonState::from_levels(self.primary_down, sample.primary_down),
            secondary: ButtonState::from_levels(self.secondary_down, sample.secondary_down),
        };
        self.primary_down = sample.primary_down;
        self.secondary_down = sample.secondary_down;
        frame
    }
}

/// Input state machine that interprets clicks against the current UI mode.
#[derive(Clone, Debug)]
pub struct InputStateMachine {
    layout: UiLayout,
}

impl InputStateMachine {
    /// Creates the state machine for the provided screen layout.
    #[must_use]
    pub const fn new(layout: UiLayout) -> Self {
        Self { layout }
    }

    /// Emits at most one command for the clicks of `frame`.
    ///
    /// An open context menu captures the primary click. Otherwise clicks in
    /// the bottom panel only select templates, a primary click on the board
    /// requests a placement and a secondary click opens or closes the menu.
    /// The `tower_at` closure should mirror the world's `query::tower_at`.
    pub fn handle<F>(
        &self,
        frame: PointerFrame,
        ui: UiView,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Point) -> Option<TowerId>,
    {
        if !frame.has_click() {
            return;
        }
        let position = frame.position;

        if let Some(menu) = ui.context_menu {
            if frame.primary.just_pressed {
                let command = if menu.sell_region(&self.layout).contains(position) {
                    Command::SellTower { tower: menu.tower }
                } else if menu.upgrade_region(&self.layout).contains(position) {
                    Command::UpgradeTower { tower: menu.tower }
                } else {
                    Command::CloseContextMenu
                };
                out.push(command);
                return;
            }
        }

        if self.layout.in_panel(position) {
            if frame.primary.just_pressed {
                if let Some(slot) = self.layout.slot_at(position) {
                    if slot < ui.template_count {
                        out.push(Command::SelectTemplate {
                            template: TemplateIndex::new(slot),
                        });
                    }
                }
            }
            return;
        }

        if frame.primary.just_pressed {
            out.push(Command::PlaceTower {
                template: ui.selected_template,
                position,
            });
            return;
        }

        match tower_at(position) {
            Some(tower) => out.push(Command::OpenContextMenu {
                tower,
                anchor: position,
            }),
            None if ui.context_menu.is_some() => out.push(Command::CloseContextMenu),
            None => {}
        }
    }
}
