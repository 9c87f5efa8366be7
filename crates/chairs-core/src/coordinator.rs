//! Coordinator task: drives the round lifecycle.
//!
//! Per round:
//!
//! 1. **StartRound**: size the gate to `active - 1` and clear the seats
//! 2. **Music**: sleep for a duration supplied by [`Timing`]
//! 3. **StopMusic**: broadcast the stop to every player
//! 4. **ClaimWindow**: wait until every active player has attempted
//! 5. **ResolveElimination**: validate the seats and remove the unseated
//! 6. **RebuildGate**: fresh gate for the next round, if there is one
//! 7. **ResumeMusic**: broadcast the resume
//!
//! When one participant remains the game ends and every player is
//! released. Any invariant violation ends the game immediately.

use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span};

use crate::config::GameConfig;
use crate::error::{InvariantViolation, Result};
use crate::events::{GameEvent, GameObserver, ParticipantId};
use crate::game::Table;
use crate::timing::Timing;

/// What happened in one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// Participants at the start of the round
    pub active: usize,
    pub chairs: usize,
    /// Seated participants in claim order
    pub seated: Vec<ParticipantId>,
    pub eliminated: ParticipantId,
}

/// Result of a finished game, as seen by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorOutcome {
    pub winner: ParticipantId,
    pub rounds: Vec<RoundRecord>,
}

/// Round driver. Owns the timing source and the observer.
pub struct Coordinator<T: Timing> {
    table: Arc<Table>,
    config: GameConfig,
    timing: T,
    observer: Arc<dyn GameObserver>,
}

impl<T: Timing> Coordinator<T> {
    pub fn new(
        table: Arc<Table>,
        config: GameConfig,
        timing: T,
        observer: Arc<dyn GameObserver>,
    ) -> Self {
        Self {
            table,
            config,
            timing,
            observer,
        }
    }

    /// Play rounds until one participant remains, then end the game.
    ///
    /// The game is ended on every exit path, so no player stays blocked.
    pub fn run(mut self) -> Result<CoordinatorOutcome> {
        let mut records = Vec::new();
        let result = self.play_rounds(&mut records);
        self.table.phase.end_game();

        match result {
            Ok(winner) => {
                let rounds = records.len() as u32;
                info!(%winner, rounds, "game over");
                self.observer.on_event(&GameEvent::GameOver { winner, rounds });
                Ok(CoordinatorOutcome {
                    winner,
                    rounds: records,
                })
            }
            Err(err) => {
                error!(
                    error = %err,
                    round = records.len() + 1,
                    active = self.table.rounds.active_count(),
                    seated = self.table.rounds.seated_ids().len(),
                    "game aborted"
                );
                Err(err)
            }
        }
    }

    fn play_rounds(&mut self, records: &mut Vec<RoundRecord>) -> Result<ParticipantId> {
        let mut round = 0;
        loop {
            let active = self.table.rounds.active_ids();
            match active.as_slice() {
                [] => {
                    return Err(InvariantViolation::EmptyActiveSet {
                        round,
                        seated: self.table.rounds.seated_ids().len(),
                    }
                    .into())
                }
                [winner] => return Ok(*winner),
                _ => {
                    round += 1;
                    records.push(self.play_round(round, active.len())?);
                }
            }
        }
    }

    /// Run one full round with `active` participants.
    fn play_round(&mut self, round: u32, active: usize) -> Result<RoundRecord> {
        let _span = info_span!("round", round).entered();
        let rounds = &self.table.rounds;

        let chairs = rounds.begin_round(round, active);
        self.observer.on_event(&GameEvent::RoundStarted {
            round,
            active,
            chairs,
        });

        let music = self.timing.music_duration(self.config.music);
        thread::sleep(music);

        self.table.phase.signal_stop(round);
        info!(?music, "music stopped");
        self.observer.on_event(&GameEvent::MusicStopped { round });

        rounds.await_claims(self.config.claim_timeout)?;

        let resolution = rounds.resolve(round)?;
        rounds.eliminate(round, resolution.unseated)?;
        self.observer.on_event(&GameEvent::RoundResolved {
            round,
            seated: resolution.seated.clone(),
            eliminated: resolution.unseated,
        });

        let remaining = rounds.active_count();
        if remaining > 1 {
            rounds.rebuild_gate(round + 1, remaining - 1);
        }

        self.table.phase.signal_resume();
        if remaining > 1 {
            thread::sleep(self.config.intermission);
        }

        Ok(RoundRecord {
            round,
            active,
            chairs,
            seated: resolution.seated,
            eliminated: resolution.unseated,
        })
    }
}
