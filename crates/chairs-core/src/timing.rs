//! How long the music plays each round.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Inclusive range of music durations, at millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicWindow {
    pub min: Duration,
    pub max: Duration,
}

impl MusicWindow {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Zero-length window: the music stops immediately.
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for MusicWindow {
    fn default() -> Self {
        Self::from_millis(1000, 3000)
    }
}

/// Supplies the music duration for each round.
pub trait Timing: Send {
    fn music_duration(&mut self, window: MusicWindow) -> Duration;
}

impl Timing for Box<dyn Timing> {
    fn music_duration(&mut self, window: MusicWindow) -> Duration {
        (**self).music_duration(window)
    }
}

/// Uniformly random durations within the window.
#[derive(Debug, Clone)]
pub struct RandomTiming {
    rng: StdRng,
}

impl RandomTiming {
    /// Seeded for reproducible runs, or drawn from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Timing for RandomTiming {
    fn music_duration(&mut self, window: MusicWindow) -> Duration {
        let min = window.min.as_millis() as u64;
        let max = (window.max.as_millis() as u64).max(min);
        Duration::from_millis(self.rng.gen_range(min..=max))
    }
}

/// The same duration every round.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTiming(pub Duration);

impl Timing for FixedTiming {
    fn music_duration(&mut self, _window: MusicWindow) -> Duration {
        self.0
    }
}
