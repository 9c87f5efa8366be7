//! Musical Chairs Concurrency Core
//!
//! N player threads contend for `N - 1` chairs while one coordinator
//! thread drives the music. Each round one player is left standing and
//! eliminated, until a single winner remains.
//!
//! # Architecture
//!
//! - **Gate** ([`ChairGate`]): lock-free counting gate, rebuilt every round
//! - **Phase** ([`PhaseBarrier`]): "music playing" / "music stopped"
//!   broadcast, tagged with the round number
//! - **Round state** ([`RoundState`]): active set, seated set, current gate
//!   and the claim join point
//! - **Player** ([`Player`]): one non-blocking claim per stopped round
//! - **Coordinator** ([`Coordinator`]): starts rounds, stops the music,
//!   resolves the elimination and resumes
//!
//! # Round Protocol
//!
//! 1. Coordinator opens round `r` with `active - 1` chairs
//! 2. Music plays for a [`Timing`]-supplied duration
//! 3. Music stops; every active player claims exactly once
//! 4. Coordinator waits until all players have reported, then removes the
//!    one participant without a chair
//! 5. Music resumes; players that are no longer active leave
//!
//! The coordinator's reading of the seated set is authoritative. A
//! player's own "I lost" flag never removes anyone.
//!
//! # Usage
//!
//! ```
//! use chairs_core::{Game, GameConfig};
//!
//! let summary = Game::new(GameConfig::instant(4)).run().unwrap();
//! assert_eq!(summary.rounds.len(), 3);
//! ```

mod config;
mod coordinator;
mod error;
mod events;
mod game;
mod gate;
mod phase;
mod player;
mod round;
mod timing;

pub use config::{GameConfig, MIN_PLAYERS};
pub use coordinator::{Coordinator, CoordinatorOutcome, RoundRecord};
pub use error::{Error, InvariantViolation, Result};
pub use events::{EventLog, GameEvent, GameObserver, NullObserver, ParticipantId};
pub use game::{Game, GameSummary, Table};
pub use gate::ChairGate;
pub use phase::{Phase, PhaseBarrier};
pub use player::{Player, PlayerReport, PlayerState};
pub use round::{unseated_of, Resolution, RoundState};
pub use timing::{FixedTiming, MusicWindow, RandomTiming, Timing};
