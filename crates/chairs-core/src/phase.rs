//! Phase barrier: "music playing" / "music stopped" broadcast signal.
//!
//! Only the coordinator flips the phase. Players block on the barrier and
//! re-check a predicate on every wake, so the state under the lock is the
//! source of truth and wake-ups can never be lost.
//!
//! Every stop carries the round number it belongs to. A player asks for a
//! stop *newer* than the last round it played and for the resume of the
//! round it is in, which keeps a slow player from missing a phase or
//! playing the same round twice when rounds follow each other closely.

use parking_lot::{Condvar, Mutex};
use tracing::trace;

/// Current value of the music flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Stopped,
}

#[derive(Debug)]
struct PhaseState {
    stopped: bool,
    round: u32,
    game_active: bool,
}

/// Two-phase broadcast barrier shared by the coordinator and all players.
#[derive(Debug)]
pub struct PhaseBarrier {
    state: Mutex<PhaseState>,
    cvar: Condvar,
}

impl Default for PhaseBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseBarrier {
    /// Barrier with the music playing and the game active.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PhaseState {
                stopped: false,
                round: 0,
                game_active: true,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Block until the music stops for a round after `last_round`.
    ///
    /// Returns the stopped round, or `None` once the game has ended.
    pub fn wait_until_stopped(&self, last_round: u32) -> Option<u32> {
        let mut state = self.state.lock();
        loop {
            if !state.game_active {
                trace!(last_round, "game over while waiting for stop");
                return None;
            }
            if state.stopped && state.round > last_round {
                trace!(round = state.round, "observed music stop");
                return Some(state.round);
            }
            self.cvar.wait(&mut state);
        }
    }

    /// Block until the music resumes after `round`.
    ///
    /// Returns `false` once the game has ended.
    pub fn wait_until_resumed(&self, round: u32) -> bool {
        let mut state = self.state.lock();
        loop {
            if !state.game_active {
                trace!(round, "game over while waiting for resume");
                return false;
            }
            if !state.stopped || state.round > round {
                trace!(round, "observed music resume");
                return true;
            }
            self.cvar.wait(&mut state);
        }
    }

    /// Stop the music for `round` and wake every waiting player.
    pub fn signal_stop(&self, round: u32) {
        {
            let mut state = self.state.lock();
            debug_assert!(round > state.round, "rounds must increase");
            state.round = round;
            state.stopped = true;
        }
        self.cvar.notify_all();
    }

    /// Resume the music and wake every waiting player.
    pub fn signal_resume(&self) {
        self.state.lock().stopped = false;
        self.cvar.notify_all();
    }

    /// Mark the game over and release every waiting player.
    pub fn end_game(&self) {
        {
            let mut state = self.state.lock();
            state.game_active = false;
            state.stopped = false;
        }
        self.cvar.notify_all();
    }

    /// Current music phase.
    pub fn phase(&self) -> Phase {
        if self.state.lock().stopped {
            Phase::Stopped
        } else {
            Phase::Playing
        }
    }

    /// Whether the game is still running.
    pub fn is_active(&self) -> bool {
        self.state.lock().game_active
    }
}
