//! Headless renderer that reports frames through `tracing`.

use anyhow::Result;
use lane_defence_rendering::{Frame, Hud, Renderer};
use tracing::{debug, info, warn};

/// Logs the heads-up display every `every` frames and whenever the session
/// ends, along with status messages as they appear.
#[derive(Debug)]
pub(crate) struct LogRenderer {
    every: u64,
    rendered: u64,
    last_status: Option<String>,
    reported_game_over: bool,
}

impl LogRenderer {
    pub(crate) fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            rendered: 0,
            last_status: None,
            reported_game_over: false,
        }
    }

    /// Number of frames presented so far.
    pub(crate) const fn rendered(&self) -> u64 {
        self.rendered
    }

    fn is_report_frame(&self) -> bool {
        self.rendered % self.every == 0
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.rendered += 1;

        let status = frame.status.map(|status| status.text);
        if status != self.last_status.as_deref() {
            if let Some(text) = status {
                info!(frame = self.rendered, "{text}");
            }
            self.last_status = status.map(str::to_owned);
        }

        for shot in &frame.shots {
            debug!(tower = ?shot.tower, from = ?shot.from, to = ?shot.to, "shot");
        }

        if frame.game_over {
            if !self.reported_game_over {
                self.reported_game_over = true;
                warn!(frame = self.rendered, "game over");
                log_hud(self.rendered, frame);
            }
            return Ok(());
        }

        if self.is_report_frame() {
            log_hud(self.rendered, frame);
        }
        Ok(())
    }
}

fn log_hud(rendered: u64, frame: &Frame<'_>) {
    let Hud {
        currency,
        lives,
        wave,
    } = frame.hud;
    info!(
        frame = rendered,
        currency,
        lives,
        wave,
        enemies = frame.enemies.len(),
        towers = frame.towers.len(),
        "hud"
    );
}
