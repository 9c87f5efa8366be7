//! Error types for chairs-core.

use thiserror::Error;

use crate::events::ParticipantId;

/// Result type for chairs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a game.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot describe a playable game.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shared round state broke one of its invariants.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Not every active player finished its claim attempt in time.
    #[error("claim window for round {round} timed out: {reported} of {expected} players reported")]
    ClaimWindowTimeout {
        round: u32,
        expected: usize,
        reported: usize,
    },

    /// A task thread could not be started.
    #[error("failed to spawn task thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A task thread panicked before it could be joined.
    #[error("task `{task}` panicked")]
    TaskPanicked { task: String },
}

/// A synchronization defect detected while resolving a round.
///
/// Every variant carries the round number together with the active and
/// seated counts observed at the time of detection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// No participant left to declare a winner.
    #[error("round {round}: active set is empty (seated {seated})")]
    EmptyActiveSet { round: u32, seated: usize },

    /// More seats were recorded than the gate had chairs.
    #[error("round {round}: {seated} seats recorded for {capacity} chairs ({active} active)")]
    SeatOverflow {
        round: u32,
        active: usize,
        seated: usize,
        capacity: usize,
    },

    /// Fewer seats were recorded than chairs after every player attempted.
    #[error("round {round}: only {seated} of {capacity} chairs taken ({active} active)")]
    SeatShortfall {
        round: u32,
        active: usize,
        seated: usize,
        capacity: usize,
    },

    /// A seat is held by someone outside the active set.
    #[error("round {round}: {participant} seated while not active ({active} active, {seated} seated)")]
    SeatedNotActive {
        round: u32,
        participant: ParticipantId,
        active: usize,
        seated: usize,
    },

    /// The same participant holds two seats.
    #[error("round {round}: {participant} seated twice ({active} active, {seated} seated)")]
    DoubleSeat {
        round: u32,
        participant: ParticipantId,
        active: usize,
        seated: usize,
    },

    /// Elimination targeted a participant that is no longer active.
    #[error("round {round}: {participant} is not active and cannot be eliminated ({active} active, {seated} seated)")]
    AlreadyEliminated {
        round: u32,
        participant: ParticipantId,
        active: usize,
        seated: usize,
    },
}

impl InvariantViolation {
    /// Round in which the violation was detected.
    pub fn round(&self) -> u32 {
        match self {
            Self::EmptyActiveSet { round, .. }
            | Self::SeatOverflow { round, .. }
            | Self::SeatShortfall { round, .. }
            | Self::SeatedNotActive { round, .. }
            | Self::DoubleSeat { round, .. }
            | Self::AlreadyEliminated { round, .. } => *round,
        }
    }
}
