//! Game runner: spawns the player threads and the coordinator thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::coordinator::{Coordinator, RoundRecord};
use crate::error::{Error, Result};
use crate::events::{GameObserver, NullObserver, ParticipantId};
use crate::phase::PhaseBarrier;
use crate::player::{Player, PlayerReport};
use crate::round::RoundState;
use crate::timing::{RandomTiming, Timing};

/// Everything the coordinator and the players share.
#[derive(Debug)]
pub struct Table {
    pub phase: PhaseBarrier,
    pub rounds: RoundState,
}

impl Table {
    /// Table for participants `P1..=Pn`.
    pub fn new(players: u32) -> Self {
        Self {
            phase: PhaseBarrier::new(),
            rounds: RoundState::with_players(players),
        }
    }

    pub fn with_participants(participants: Vec<ParticipantId>) -> Self {
        Self {
            phase: PhaseBarrier::new(),
            rounds: RoundState::new(participants),
        }
    }
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub winner: ParticipantId,
    pub rounds: Vec<RoundRecord>,
    /// One report per participant, ordered by id
    pub players: Vec<PlayerReport>,
}

impl GameSummary {
    /// Participants in the order they were eliminated.
    pub fn eliminations(&self) -> Vec<ParticipantId> {
        self.rounds.iter().map(|r| r.eliminated).collect()
    }
}

/// One game of musical chairs.
pub struct Game {
    config: GameConfig,
    timing: Box<dyn Timing>,
    observer: Arc<dyn GameObserver>,
}

impl Game {
    /// Game with random music durations and no observer.
    pub fn new(config: GameConfig) -> Self {
        let timing = Box::new(RandomTiming::new(config.seed));
        Self {
            config,
            timing,
            observer: Arc::new(NullObserver),
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: impl Timing + 'static) -> Self {
        self.timing = Box::new(timing);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play the game to the end and join every task.
    pub fn run(self) -> Result<GameSummary> {
        self.config.validate()?;
        let count = u32::try_from(self.config.players).map_err(|_| {
            Error::InvalidConfig(format!("too many players: {}", self.config.players))
        })?;
        let table = Arc::new(Table::new(count));
        info!(players = self.config.players, "starting game");

        let mut players = Vec::with_capacity(self.config.players);
        for id in table.rounds.active_ids() {
            let player = Player::new(id, Arc::clone(&table));
            let spawned = thread::Builder::new()
                .name(format!("player-{}", id.0))
                .spawn(move || player.run());
            match spawned {
                Ok(handle) => players.push((id, handle)),
                Err(err) => return Err(abort(&table, players, err.into())),
            }
        }

        let coordinator = Coordinator::new(
            Arc::clone(&table),
            self.config.clone(),
            self.timing,
            self.observer,
        );
        let spawned = thread::Builder::new()
            .name("coordinator".into())
            .spawn(move || coordinator.run());
        let coordinator = match spawned {
            Ok(handle) => handle,
            Err(err) => return Err(abort(&table, players, err.into())),
        };

        let outcome = coordinator.join().map_err(|_| Error::TaskPanicked {
            task: "coordinator".into(),
        });
        if outcome.is_err() {
            table.phase.end_game();
        }

        let reports = join_players(players);
        let outcome = outcome??;
        let mut reports = reports?;
        reports.sort_by_key(|r| r.id);

        debug!(winner = %outcome.winner, "all tasks joined");
        Ok(GameSummary {
            winner: outcome.winner,
            rounds: outcome.rounds,
            players: reports,
        })
    }
}

fn join_players(
    players: Vec<(ParticipantId, JoinHandle<PlayerReport>)>,
) -> Result<Vec<PlayerReport>> {
    let mut reports = Vec::with_capacity(players.len());
    let mut panicked = None;
    for (id, handle) in players {
        match handle.join() {
            Ok(report) => reports.push(report),
            Err(_) => {
                panicked.get_or_insert(Error::TaskPanicked {
                    task: format!("player-{}", id.0),
                });
            }
        }
    }
    match panicked {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

fn abort(
    table: &Table,
    players: Vec<(ParticipantId, JoinHandle<PlayerReport>)>,
    err: Error,
) -> Error {
    table.phase.end_game();
    let _ = join_players(players);
    err
}
