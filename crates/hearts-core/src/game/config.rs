use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TARGET_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// The game ends after the first round in which any cumulative score reaches this.
    #[serde(default = "default_target_score")]
    pub target_score: u32,
    /// Seed for the default shuffling dealer; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            seed: None,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub const fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_score == 0 {
            return Err(ConfigError::ZeroTargetScore);
        }
        Ok(())
    }
}

fn default_target_score() -> u32 {
    DEFAULT_TARGET_SCORE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("target score must be greater than zero")]
    ZeroTargetScore,
}
