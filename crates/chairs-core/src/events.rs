//! Game events and the presentation seam.
//!
//! The core never renders anything itself. It reports what happened at
//! four points of every game through a [`GameObserver`], and the caller
//! decides how to show it.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Stable participant identifier, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Events emitted by the coordinator over the course of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A round began and the music is playing
    RoundStarted {
        round: u32,
        active: usize,
        chairs: usize,
    },

    /// The music stopped; players are claiming chairs
    MusicStopped { round: u32 },

    /// Claims are closed and one participant was eliminated
    RoundResolved {
        round: u32,
        /// Seated participants in claim order
        seated: Vec<ParticipantId>,
        eliminated: ParticipantId,
    },

    /// One participant remains
    GameOver { winner: ParticipantId, rounds: u32 },
}

/// Receives game events as they happen.
///
/// Called from the coordinator thread only, never while a lock on shared
/// round state is held.
pub trait GameObserver: Send + Sync {
    fn on_event(&self, event: &GameEvent);
}

impl<O: GameObserver + ?Sized> GameObserver for std::sync::Arc<O> {
    fn on_event(&self, event: &GameEvent) {
        (**self).on_event(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn on_event(&self, _event: &GameEvent) {}
}

/// Records events in memory for later inspection.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<GameEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl GameObserver for EventLog {
    fn on_event(&self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn participant_displays_with_prefix() {
        assert_eq!(ParticipantId(3).to_string(), "P3");
    }

    #[test]
    fn event_log_records_in_order() {
        let log = Arc::new(EventLog::new());
        let observer: Arc<dyn GameObserver> = log.clone();

        observer.on_event(&GameEvent::MusicStopped { round: 1 });
        observer.on_event(&GameEvent::GameOver {
            winner: ParticipantId(2),
            rounds: 1,
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0], GameEvent::MusicStopped { round: 1 });
    }

    #[test]
    fn events_are_tagged_by_type() {
        let event = GameEvent::RoundStarted {
            round: 1,
            active: 4,
            chairs: 3,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "RoundStarted");
        assert_eq!(json["chairs"], 3);
    }
}
