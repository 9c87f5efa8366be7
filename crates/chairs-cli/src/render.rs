//! Console and JSON-lines renderers for game events.

use chairs_core::{GameEvent, GameObserver};

const RULE: &str = "-----------------------------------------------";

/// Human-readable round-by-round output.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn banner(&self, players: usize) {
        println!("{RULE}");
        println!("Welcome to Concurrent Musical Chairs!");
        println!("{RULE}");
        println!("{} players, one winner.", players);
    }
}

impl GameObserver for ConsoleRenderer {
    fn on_event(&self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { round, active, chairs } => {
                println!();
                println!("{RULE}");
                println!(
                    "Round {}: {} players and {} chairs.",
                    round, active, chairs
                );
                println!("The music is playing...");
            }
            GameEvent::MusicStopped { .. } => {
                println!();
                println!("> The music stopped! Players are trying to sit...");
            }
            GameEvent::RoundResolved { seated, eliminated, .. } => {
                println!();
                println!("{RULE}");
                for (chair, participant) in seated.iter().enumerate() {
                    println!("[Chair {}]: taken by {}", chair + 1, participant);
                }
                println!();
                println!(
                    "Player {} could not find a chair and is eliminated!",
                    eliminated
                );
                println!("{RULE}");
            }
            GameEvent::GameOver { winner, rounds } => {
                println!();
                println!("{RULE}");
                println!("Winner: Player {} after {} rounds!", winner, rounds);
                println!("{RULE}");
                println!();
                println!("Thanks for playing Concurrent Musical Chairs!");
            }
        }
    }
}

/// One JSON object per event on stdout.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl GameObserver for JsonRenderer {
    fn on_event(&self, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "failed to serialize event"),
        }
    }
}
