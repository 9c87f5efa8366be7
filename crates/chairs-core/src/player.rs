//! Player task: one per participant.
//!
//! ```text
//! WaitingForStop -> Claiming -> WaitingForResume -> WaitingForStop -> ...
//!        |                             |
//!        +---------> Terminated <------+
//! ```
//!
//! A player makes exactly one non-blocking claim per stopped round. Losing
//! the claim is not an error; it only sets the local `eliminated` flag.
//! Removal from the game is the coordinator's call: after each resume the
//! player checks the active set and leaves once it is no longer in it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::events::ParticipantId;
use crate::game::Table;

/// Where a player is in its round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Music is playing; waiting for it to stop
    WaitingForStop,
    /// Music stopped for this round; about to claim
    Claiming { round: u32 },
    /// Claim attempted; waiting for the music to resume
    WaitingForResume { round: u32 },
    /// Out of the game, or the game is over
    Terminated,
}

/// What a player did over the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub id: ParticipantId,
    /// Rounds in which the player made a claim
    pub rounds_played: u32,
    /// Rounds in which the claim succeeded
    pub seats_won: u32,
    /// Round in which the player's claim failed, if any
    pub eliminated_in: Option<u32>,
}

/// A participant's task state.
#[derive(Debug)]
pub struct Player {
    id: ParticipantId,
    table: Arc<Table>,
    state: PlayerState,
    last_round: u32,
    eliminated: bool,
    report: PlayerReport,
}

impl Player {
    pub fn new(id: ParticipantId, table: Arc<Table>) -> Self {
        Self {
            id,
            table,
            state: PlayerState::WaitingForStop,
            last_round: 0,
            eliminated: false,
            report: PlayerReport {
                id,
                rounds_played: 0,
                seats_won: 0,
                eliminated_in: None,
            },
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether this player lost a claim. Informational only.
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Perform one transition, blocking if the current state waits.
    pub fn step(&mut self) -> PlayerState {
        self.state = match self.state {
            PlayerState::WaitingForStop => {
                match self.table.phase.wait_until_stopped(self.last_round) {
                    Some(round) => PlayerState::Claiming { round },
                    None => PlayerState::Terminated,
                }
            }
            PlayerState::Claiming { round } => {
                self.claim(round);
                PlayerState::WaitingForResume { round }
            }
            PlayerState::WaitingForResume { round } => {
                if self.table.phase.wait_until_resumed(round) {
                    self.after_resume(round)
                } else {
                    PlayerState::Terminated
                }
            }
            PlayerState::Terminated => PlayerState::Terminated,
        };
        self.state
    }

    /// Play until terminated.
    pub fn run(mut self) -> PlayerReport {
        let _span = debug_span!("player", id = %self.id).entered();
        while self.step() != PlayerState::Terminated {}
        debug!(
            rounds = self.report.rounds_played,
            seats = self.report.seats_won,
            "player finished"
        );
        self.report
    }

    fn claim(&mut self, round: u32) {
        let gate = self.table.rounds.gate();
        if gate.round() != round {
            warn!(
                round,
                gate_round = gate.round(),
                "claiming against a gate from another round"
            );
        }

        if gate.try_claim() {
            self.table.rounds.record_seat(self.id);
            self.report.seats_won += 1;
            debug!(round, "claimed a chair");
        } else {
            self.eliminated = true;
            self.report.eliminated_in = Some(round);
            debug!(round, "no chair left");
        }

        self.report.rounds_played += 1;
        self.last_round = round;
        self.table.rounds.report_attempt(round);
    }

    fn after_resume(&mut self, round: u32) -> PlayerState {
        let active = self.table.rounds.is_active(self.id);
        if active == self.eliminated {
            warn!(
                round,
                eliminated = self.eliminated,
                active,
                "local elimination flag disagrees with active set"
            );
        }
        if active {
            trace!(round, "still in the game");
            PlayerState::WaitingForStop
        } else {
            PlayerState::Terminated
        }
    }
}
