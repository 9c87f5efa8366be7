//! Musical Chairs runner
//!
//! Plays one game and renders it to the console.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chairs_core::{Game, GameConfig, GameObserver, MusicWindow};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

use render::{ConsoleRenderer, JsonRenderer};

/// Concurrent musical chairs: N player threads, N - 1 chairs per round
#[derive(Debug, Parser)]
#[command(name = "musical-chairs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of players at the start (at least 2)
    #[arg(short, long, env = "CHAIRS_PLAYERS", default_value_t = 4)]
    players: usize,

    /// Shortest time the music plays each round, in milliseconds
    #[arg(long, env = "CHAIRS_MUSIC_MIN_MS", default_value_t = 1000)]
    music_min_ms: u64,

    /// Longest time the music plays each round, in milliseconds
    #[arg(long, env = "CHAIRS_MUSIC_MAX_MS", default_value_t = 3000)]
    music_max_ms: u64,

    /// How long to wait for every claim attempt, in milliseconds
    #[arg(long, env = "CHAIRS_CLAIM_TIMEOUT_MS", default_value_t = 5000)]
    claim_timeout_ms: u64,

    /// Pause between rounds, in milliseconds
    #[arg(long, env = "CHAIRS_INTERMISSION_MS", default_value_t = 1000)]
    intermission_ms: u64,

    /// Seed for reproducible music durations
    #[arg(long, env = "CHAIRS_SEED")]
    seed: Option<u64>,

    /// Emit events as JSON lines instead of console text
    #[arg(long)]
    json: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "CHAIRS_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::default()
            .with_players(self.players)
            .with_music(MusicWindow::from_millis(self.music_min_ms, self.music_max_ms))
            .with_claim_timeout(Duration::from_millis(self.claim_timeout_ms))
            .with_intermission(Duration::from_millis(self.intermission_ms));
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, the game goes to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    config.validate().context("invalid game configuration")?;

    let observer: Arc<dyn GameObserver> = if cli.json {
        Arc::new(JsonRenderer)
    } else {
        let console = ConsoleRenderer;
        console.banner(config.players);
        Arc::new(console)
    };

    tracing::info!(players = config.players, seed = ?config.seed, "starting musical chairs");

    let summary = Game::new(config)
        .with_observer(observer)
        .run()
        .context("game aborted")?;

    tracing::info!(winner = %summary.winner, rounds = summary.rounds.len(), "game finished");
    Ok(())
}
