//! Game configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::timing::MusicWindow;

/// Smallest playable game.
pub const MIN_PLAYERS: usize = 2;

/// Configuration for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of participants at the start
    pub players: usize,
    /// Range the music duration is drawn from each round
    pub music: MusicWindow,
    /// How long the coordinator waits for every claim attempt
    pub claim_timeout: Duration,
    /// Pause after the music resumes, before the next round starts
    pub intermission: Duration,
    /// Seed for reproducible music durations
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 4,
            music: MusicWindow::default(),
            claim_timeout: Duration::from_secs(5),
            intermission: Duration::from_millis(1000),
            seed: None,
        }
    }
}

impl GameConfig {
    /// No music and no intermission: rounds run back to back.
    #[must_use]
    pub fn instant(players: usize) -> Self {
        Self {
            players,
            music: MusicWindow::instant(),
            intermission: Duration::ZERO,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub fn with_music(mut self, music: MusicWindow) -> Self {
        self.music = music;
        self
    }

    #[must_use]
    pub fn with_claim_timeout(mut self, timeout: Duration) -> Self {
        self.claim_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_intermission(mut self, intermission: Duration) -> Self {
        self.intermission = intermission;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations that cannot produce a winner.
    pub fn validate(&self) -> Result<()> {
        if self.players < MIN_PLAYERS {
            return Err(Error::InvalidConfig(format!(
                "at least {} players required, got {}",
                MIN_PLAYERS, self.players
            )));
        }
        if u32::try_from(self.players).is_err() {
            return Err(Error::InvalidConfig(format!(
                "too many players: {}",
                self.players
            )));
        }
        if self.claim_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "claim timeout must be greater than zero".into(),
            ));
        }
        if self.music.min > self.music.max {
            return Err(Error::InvalidConfig(format!(
                "music window is inverted: {:?} > {:?}",
                self.music.min, self.music.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.players, 4);
        assert_eq!(config.music, MusicWindow::from_millis(1000, 3000));
    }

    #[test]
    fn rejects_single_player() {
        let err = GameConfig::instant(1).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_window() {
        let config = GameConfig::default().with_music(MusicWindow::from_millis(50, 10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_claim_timeout() {
        let config = GameConfig::instant(8).with_claim_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfig(_)
        ));
        assert!(config
            .with_claim_timeout(Duration::from_millis(1))
            .validate()
            .is_ok());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn rejects_more_players_than_participant_ids() {
        let config = GameConfig::instant(u32::MAX as usize + 1);
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfig(_)
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let config = GameConfig::instant(6)
            .with_seed(9)
            .with_claim_timeout(Duration::from_millis(250));

        assert_eq!(config.players, 6);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.claim_timeout, Duration::from_millis(250));
        assert_eq!(config.intermission, Duration::ZERO);
    }
}
