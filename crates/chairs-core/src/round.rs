//! Round state: who is still playing, who holds a chair, and the gate.
//!
//! The active set, the seated set, the current gate and the claim latch
//! each sit behind their own lock. Every operation takes one lock at a
//! time and releases it before returning. No lock is held across a
//! blocking wait.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::error::{Error, InvariantViolation, Result};
use crate::events::ParticipantId;
use crate::gate::ChairGate;

/// Outcome of a round once claims are closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Seated participants in claim order.
    pub seated: Vec<ParticipantId>,
    /// The one active participant without a chair.
    pub unseated: ParticipantId,
}

#[derive(Debug, Default)]
struct LatchState {
    round: u32,
    expected: usize,
    reported: usize,
}

/// Countdown join point for the claim window of one round.
#[derive(Debug, Default)]
struct ClaimLatch {
    state: Mutex<LatchState>,
    cvar: Condvar,
}

impl ClaimLatch {
    fn arm(&self, round: u32, expected: usize) {
        *self.state.lock() = LatchState {
            round,
            expected,
            reported: 0,
        };
    }

    fn report(&self, round: u32) {
        let mut state = self.state.lock();
        if state.round != round {
            return;
        }
        state.reported += 1;
        if state.reported >= state.expected {
            self.cvar.notify_all();
        }
    }

    fn wait(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.reported < state.expected {
            if self.cvar.wait_until(&mut state, deadline).timed_out()
                && state.reported < state.expected
            {
                return Err(Error::ClaimWindowTimeout {
                    round: state.round,
                    expected: state.expected,
                    reported: state.reported,
                });
            }
        }
        Ok(())
    }
}

/// Shared per-game records read and written by the coordinator and players.
#[derive(Debug)]
pub struct RoundState {
    active: Mutex<Vec<ParticipantId>>,
    seated: Mutex<Vec<ParticipantId>>,
    gate: Mutex<Arc<ChairGate>>,
    latch: ClaimLatch,
}

impl RoundState {
    /// State for participants `P1..=Pn`, with a gate of `n - 1` chairs.
    pub fn with_players(players: u32) -> Self {
        let ids = (1..=players).map(ParticipantId).collect();
        Self::new(ids)
    }

    /// State for an explicit set of participants.
    pub fn new(participants: Vec<ParticipantId>) -> Self {
        let chairs = participants.len().saturating_sub(1);
        Self {
            active: Mutex::new(participants),
            seated: Mutex::new(Vec::new()),
            gate: Mutex::new(Arc::new(ChairGate::new(0, chairs))),
            latch: ClaimLatch::default(),
        }
    }

    /// Prepare round `round` for `active_count` participants.
    ///
    /// Clears the seated set, rebuilds the gate with `active_count - 1`
    /// chairs and arms the claim latch. Returns the chair count.
    pub fn begin_round(&self, round: u32, active_count: usize) -> usize {
        let chairs = active_count.saturating_sub(1);
        self.seated.lock().clear();
        self.rebuild_gate(round, chairs);
        self.latch.arm(round, active_count);
        info!(round, active = active_count, chairs, "round started");
        chairs
    }

    /// Replace the gate with a fresh one of `capacity` chairs.
    pub fn rebuild_gate(&self, round: u32, capacity: usize) -> Arc<ChairGate> {
        let gate = Arc::new(ChairGate::new(round, capacity));
        *self.gate.lock() = Arc::clone(&gate);
        debug!(round, capacity, "chair gate rebuilt");
        gate
    }

    /// The gate for the current round.
    pub fn gate(&self) -> Arc<ChairGate> {
        Arc::clone(&self.gate.lock())
    }

    /// Record that `participant` won a chair.
    pub fn record_seat(&self, participant: ParticipantId) {
        self.seated.lock().push(participant);
    }

    /// Mark one player's claim attempt for `round` as finished.
    pub fn report_attempt(&self, round: u32) {
        self.latch.report(round);
    }

    /// Block until every active player has attempted its claim.
    pub fn await_claims(&self, timeout: Duration) -> Result<()> {
        self.latch.wait(timeout)
    }

    /// Remove `participant` from the active set.
    pub fn eliminate(&self, round: u32, participant: ParticipantId) -> Result<()> {
        let (before, remaining) = {
            let mut active = self.active.lock();
            let before = active.len();
            active.retain(|id| *id != participant);
            (before, active.len())
        };
        if remaining == before {
            return Err(InvariantViolation::AlreadyEliminated {
                round,
                participant,
                active: before,
                seated: self.seated.lock().len(),
            }
            .into());
        }
        info!(round, %participant, remaining, "participant eliminated");
        Ok(())
    }

    /// Close the claim window and find who is left standing.
    ///
    /// Checks the seated set against the gate and the active set before
    /// naming the unseated participant.
    pub fn resolve(&self, round: u32) -> std::result::Result<Resolution, InvariantViolation> {
        let active = self.active_ids();
        let seated = self.seated_ids();
        let capacity = self.gate().capacity();
        let (active_count, seated_count) = (active.len(), seated.len());

        if active.is_empty() {
            return Err(InvariantViolation::EmptyActiveSet {
                round,
                seated: seated_count,
            });
        }
        if seated_count > capacity {
            return Err(InvariantViolation::SeatOverflow {
                round,
                active: active_count,
                seated: seated_count,
                capacity,
            });
        }
        for (i, participant) in seated.iter().enumerate() {
            if seated[..i].contains(participant) {
                return Err(InvariantViolation::DoubleSeat {
                    round,
                    participant: *participant,
                    active: active_count,
                    seated: seated_count,
                });
            }
            if !active.contains(participant) {
                return Err(InvariantViolation::SeatedNotActive {
                    round,
                    participant: *participant,
                    active: active_count,
                    seated: seated_count,
                });
            }
        }
        if seated_count < capacity {
            return Err(InvariantViolation::SeatShortfall {
                round,
                active: active_count,
                seated: seated_count,
                capacity,
            });
        }

        let unseated =
            unseated_of(&active, &seated).ok_or(InvariantViolation::SeatOverflow {
                round,
                active: active_count,
                seated: seated_count,
                capacity,
            })?;
        Ok(Resolution { seated, unseated })
    }

    /// Snapshot of the active set.
    pub fn active_ids(&self) -> Vec<ParticipantId> {
        self.active.lock().clone()
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_active(&self, participant: ParticipantId) -> bool {
        self.active.lock().contains(&participant)
    }

    /// Snapshot of the seated set, in claim order.
    pub fn seated_ids(&self) -> Vec<ParticipantId> {
        self.seated.lock().clone()
    }
}

/// The first active participant that holds no seat.
///
/// Deterministic: active order decides when more than one is unseated.
pub fn unseated_of(active: &[ParticipantId], seated: &[ParticipantId]) -> Option<ParticipantId> {
    active.iter().copied().find(|id| !seated.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;

    fn ids(raw: &[u32]) -> Vec<ParticipantId> {
        raw.iter().copied().map(ParticipantId).collect()
    }

    fn seat_all(state: &RoundState, raw: &[u32]) {
        let gate = state.gate();
        for id in ids(raw) {
            assert!(gate.try_claim());
            state.record_seat(id);
        }
    }

    #[test]
    fn with_players_numbers_from_one() {
        let state = RoundState::with_players(3);
        assert_eq!(state.active_ids(), ids(&[1, 2, 3]));
        assert_eq!(state.gate().capacity(), 2);
        assert!(RoundState::with_players(0).active_ids().is_empty());
    }

    #[test]
    fn begin_round_sizes_gate_and_clears_seats() {
        let state = RoundState::with_players(4);
        state.record_seat(ParticipantId(1));

        let chairs = state.begin_round(1, 4);

        assert_eq!(chairs, 3);
        assert_eq!(state.gate().capacity(), 3);
        assert_eq!(state.gate().round(), 1);
        assert!(state.seated_ids().is_empty());
    }

    #[test]
    fn resolve_names_the_unseated_participant() {
        let state = RoundState::with_players(4);
        state.begin_round(1, 4);
        seat_all(&state, &[3, 1, 4]);

        let resolution = state.resolve(1).unwrap();
        assert_eq!(resolution.unseated, ParticipantId(2));
        assert_eq!(resolution.seated, ids(&[3, 1, 4]));
    }

    #[test]
    fn resolve_rejects_double_seat() {
        let state = RoundState::with_players(4);
        state.begin_round(1, 4);
        state.record_seat(ParticipantId(1));
        state.record_seat(ParticipantId(1));
        state.record_seat(ParticipantId(2));

        assert!(matches!(
            state.resolve(1),
            Err(InvariantViolation::DoubleSeat { participant: ParticipantId(1), .. })
        ));
    }

    #[test]
    fn resolve_rejects_overflow() {
        let state = RoundState::with_players(2);
        state.begin_round(1, 2);
        state.record_seat(ParticipantId(1));
        state.record_seat(ParticipantId(2));

        assert!(matches!(
            state.resolve(1),
            Err(InvariantViolation::SeatOverflow { seated: 2, capacity: 1, .. })
        ));
    }

    #[test]
    fn resolve_rejects_seat_for_inactive_participant() {
        let state = RoundState::with_players(3);
        state.eliminate(1, ParticipantId(3)).unwrap();
        state.begin_round(2, 2);
        state.record_seat(ParticipantId(3));

        assert!(matches!(
            state.resolve(2),
            Err(InvariantViolation::SeatedNotActive { participant: ParticipantId(3), .. })
        ));
    }

    #[test]
    fn resolve_rejects_shortfall() {
        let state = RoundState::with_players(4);
        state.begin_round(1, 4);
        seat_all(&state, &[1]);

        assert!(matches!(
            state.resolve(1),
            Err(InvariantViolation::SeatShortfall { seated: 1, capacity: 3, .. })
        ));
    }

    #[test]
    fn resolve_on_empty_active_set() {
        let state = RoundState::new(Vec::new());
        assert!(matches!(
            state.resolve(1),
            Err(InvariantViolation::EmptyActiveSet { round: 1, .. })
        ));
    }

    #[test]
    fn eliminate_twice_is_a_violation() {
        let state = RoundState::with_players(3);
        state.eliminate(1, ParticipantId(2)).unwrap();

        let err = state.eliminate(2, ParticipantId(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::Invariant(InvariantViolation::AlreadyEliminated { .. })
        ));
        assert_eq!(state.active_ids(), ids(&[1, 3]));
    }

    #[test]
    fn latch_releases_after_all_reports() {
        let state = Arc::new(RoundState::with_players(3));
        state.begin_round(1, 3);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || state.report_attempt(1))
            })
            .collect();

        state.await_claims(Duration::from_secs(5)).unwrap();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn latch_ignores_stale_reports_and_times_out() {
        let state = RoundState::with_players(2);
        state.begin_round(2, 2);
        state.report_attempt(1);
        state.report_attempt(2);

        let err = state.await_claims(Duration::from_millis(20)).unwrap_err();
        assert!(matches!(
            err,
            Error::ClaimWindowTimeout { round: 2, expected: 2, reported: 1 }
        ));
    }

    #[test]
    fn unseated_of_picks_first_in_active_order() {
        assert_eq!(unseated_of(&ids(&[1, 2, 3]), &ids(&[2])), Some(ParticipantId(1)));
        assert_eq!(unseated_of(&ids(&[1, 2]), &ids(&[2, 1])), None);
        assert_eq!(unseated_of(&[], &[]), None);
    }

    proptest! {
        #[test]
        fn unseated_is_the_missing_id(n in 2u32..24, skip in 0u32..24) {
            let skip = 1 + skip % n;
            let active: Vec<_> = (1..=n).map(ParticipantId).collect();
            let mut seated: Vec<_> = active.iter().copied().filter(|id| id.0 != skip).collect();
            seated.reverse();

            prop_assert_eq!(unseated_of(&active, &seated), Some(ParticipantId(skip)));
        }
    }
}
