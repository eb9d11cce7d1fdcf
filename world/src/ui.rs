//! Transient UI state owned by the world.

use lane_defence_core::{ContextMenu, TemplateIndex, TowerId};

use crate::StatusMessage;

#[derive(Clone, Debug, Default)]
pub(crate) struct UiState {
    pub(crate) selected_template: TemplateIndex,
    pub(crate) context_menu: Option<ContextMenu>,
    pub(crate) status: Option<StatusMessage>,
}

impl UiState {
    /// Replaces any visible message.
    pub(crate) fn show(&mut self, text: String, ticks: u32) {
        self.status = Some(StatusMessage {
            text,
            remaining_ticks: ticks,
        });
    }

    pub(crate) fn age_status(&mut self) {
        if let Some(status) = &mut self.status {
            status.remaining_ticks = status.remaining_ticks.saturating_sub(1);
            if status.remaining_ticks == 0 {
                self.status = None;
            }
        }
    }

    /// Closes the menu when it is bound to `tower`, reporting whether it was.
    pub(crate) fn close_menu_for(&mut self, tower: TowerId) -> bool {
        if self.context_menu.is_some_and(|menu| menu.tower == tower) {
            self.context_menu = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_expires_after_its_ticks() {
        let mut ui = UiState::default();
        ui.show("hello".to_owned(), 2);
        ui.age_status();
        assert_eq!(ui.status.as_ref().map(|s| s.remaining_ticks), Some(1));
        ui.age_status();
        assert!(ui.status.is_none());
    }

    #[test]
    fn newer_message_overwrites_older() {
        let mut ui = UiState::default();
        ui.show("first".to_owned(), 90);
        ui.age_status();
        ui.show("second".to_owned(), 90);
        let status = ui.status.expect("status");
        assert_eq!(status.text, "second");
        assert_eq!(status.remaining_ticks, 90);
    }
}
