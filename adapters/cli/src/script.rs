//! Scripted pointer input for headless sessions.

use std::str::FromStr;

use lane_defence_core::{InputSource, Point, PointerSample};
use thiserror::Error;
use tracing::debug;

/// Pointer button pressed by a scripted click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Button {
    Primary,
    Secondary,
}

/// Click issued on a specific tick, written as `tick:x,y` or `tick:x,y:right`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScriptedClick {
    pub(crate) tick: u64,
    pub(crate) position: Point,
    pub(crate) button: Button,
}

/// Reasons a click argument cannot be understood.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ClickParseError {
    #[error("expected `tick:x,y` or `tick:x,y:right`, got `{0}`")]
    Shape(String),
    #[error("invalid tick `{0}`")]
    Tick(String),
    #[error("invalid coordinate `{0}`")]
    Coordinate(String),
    #[error("unknown button `{0}`, expected `left` or `right`")]
    Button(String),
}

impl FromStr for ScriptedClick {
    type Err = ClickParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(':');
        let (Some(tick), Some(position)) = (parts.next(), parts.next()) else {
            return Err(ClickParseError::Shape(value.to_owned()));
        };
        let button = match parts.next() {
            None | Some("left") => Button::Primary,
            Some("right") => Button::Secondary,
            Some(other) => return Err(ClickParseError::Button(other.to_owned())),
        };
        if parts.next().is_some() {
            return Err(ClickParseError::Shape(value.to_owned()));
        }

        let tick = tick
            .trim()
            .parse()
            .map_err(|_| ClickParseError::Tick(tick.to_owned()))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| ClickParseError::Shape(value.to_owned()))?;

        Ok(Self {
            tick,
            position: Point::new(coordinate(x)?, coordinate(y)?),
            button,
        })
    }
}

fn coordinate(text: &str) -> Result<f64, ClickParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ClickParseError::Coordinate(text.to_owned()))
}

/// Replays a list of clicks, one sample per tick.
///
/// Ticks are counted from one. A click presses its button for a single tick
/// and never fires before the tick it names. A button is released for at
/// least one tick between two presses, so a click that would continue a
/// held press is deferred by a tick. Between clicks the pointer rests where
/// it last clicked.
#[derive(Debug)]
pub(crate) struct ScriptedInput {
    clicks: Vec<ScriptedClick>,
    next: usize,
    tick: u64,
    previous: PointerSample,
}

impl ScriptedInput {
    pub(crate) fn new(mut clicks: Vec<ScriptedClick>) -> Self {
        clicks.sort_by_key(|click| click.tick);
        Self {
            clicks,
            next: 0,
            tick: 0,
            previous: PointerSample::idle(Point::new(0.0, 0.0)),
        }
    }

    fn is_held(&self, button: Button) -> bool {
        match button {
            Button::Primary => self.previous.primary_down,
            Button::Secondary => self.previous.secondary_down,
        }
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> PointerSample {
        self.tick += 1;
        let resting = PointerSample::idle(self.previous.position);

        let due = self
            .clicks
            .get(self.next)
            .filter(|click| click.tick <= self.tick)
            .copied();
        let sample = match due {
            Some(click) if !self.is_held(click.button) => {
                self.next += 1;
                PointerSample {
                    position: click.position,
                    primary_down: click.button == Button::Primary,
                    secondary_down: click.button == Button::Secondary,
                }
            }
            Some(click) => {
                debug!(tick = self.tick, scheduled = click.tick, "click deferred for release");
                resting
            }
            None => resting,
        };

        self.previous = sample;
        sample
    }
}
