//! Outward-facing collaborators notified by the action rules.
//!
//! None of these are consulted for decisions. Messages, visual effects and
//! view tracking are fire-and-forget; [`EventLog`] records them for the
//! binary and for tests, [`NullHooks`] drops them.

use glam::IVec2;
use serde::Serialize;

use crate::location::{HexDir, Location};

/// Receives short player-facing notifications.
pub trait Messenger {
    /// Emits a message.
    fn emit(&mut self, text: &str);
}

/// Receives visual effect requests.
pub trait Effects {
    /// A beam fired from `origin` along `dir` for `distance` cells.
    fn beam(&mut self, origin: Location, dir: HexDir, distance: u32, color: Color);

    /// An explosion at `at`.
    fn explosion(&mut self, at: Location);
}

/// Tracks the player's position for the field-of-view layer.
pub trait ViewTracker {
    /// The player moved by `delta`.
    fn move_view(&mut self, delta: IVec2);
}

/// Every collaborator the action rules talk to.
pub trait Hooks: Messenger + Effects + ViewTracker {}

impl<T: Messenger + Effects + ViewTracker> Hooks for T {}

/// Colour of a beam effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Colour of ordinary gunfire.
    pub const PINK: Self = Self::rgb(255, 192, 203);

    /// Colour from channel values.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Collaborator that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl Messenger for NullHooks {
    fn emit(&mut self, _text: &str) {}
}

impl Effects for NullHooks {
    fn beam(&mut self, _origin: Location, _dir: HexDir, _distance: u32, _color: Color) {}

    fn explosion(&mut self, _at: Location) {}
}

impl ViewTracker for NullHooks {
    fn move_view(&mut self, _delta: IVec2) {}
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// See [`Messenger::emit`].
    Message {
        /// Message text.
        text: String,
    },
    /// See [`Effects::beam`].
    Beam {
        /// Where the beam starts.
        origin: Location,
        /// Direction of travel.
        dir: HexDir,
        /// Cells travelled.
        distance: u32,
        /// Beam colour.
        color: Color,
    },
    /// See [`Effects::explosion`].
    Explosion {
        /// Where it exploded.
        at: Location,
    },
    /// See [`ViewTracker::move_view`].
    ViewMoved {
        /// Player displacement.
        delta: IVec2,
    },
}

/// Collaborator that records every notification in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Texts of recorded messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Removes and returns all recorded events.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Event> {
        self.events.drain(..)
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Messenger for EventLog {
    fn emit(&mut self, text: &str) {
        self.events.push(Event::Message {
            text: text.to_owned(),
        });
    }
}

impl Effects for EventLog {
    fn beam(&mut self, origin: Location, dir: HexDir, distance: u32, color: Color) {
        self.events.push(Event::Beam {
            origin,
            dir,
            distance,
            color,
        });
    }

    fn explosion(&mut self, at: Location) {
        self.events.push(Event::Explosion { at });
    }
}

impl ViewTracker for EventLog {
    fn move_view(&mut self, delta: IVec2) {
        self.events.push(Event::ViewMoved { delta });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn log_records_in_order_and_drains() {
        let mut log = EventLog::new();
        log.emit("Zap!");
        log.explosion(Location::new(1, 1));
        log.emit("Crush!");
        assert_eq!(log.messages(), vec!["Zap!", "Crush!"]);
        assert_eq!(log.events().len(), 3);
        let drained: Vec<_> = log.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
    }

    #[rstest]
    fn events_serialise_with_tag() {
        let event = Event::Explosion {
            at: Location::new(2, 3),
        };
        let json = serde_json::to_string(&event).expect("event serialises");
        assert_eq!(json, r#"{"event":"explosion","at":{"x":2,"y":3}}"#);
    }
}
