use super::store::{KeyValueStore, StoreError};

/// Key the high score lives under
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// The one value that survives between sessions
pub struct HighScores {
    store: Box<dyn KeyValueStore>,
    persisted: u32,
}

impl HighScores {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            persisted: 0,
        }
    }

    /// Read the stored high score. Absent or unreadable values count as 0.
    pub fn load(&mut self) -> u32 {
        self.persisted = match self.store.get(HIGH_SCORE_KEY) {
            Ok(Some(value)) => u32::try_from(value).unwrap_or(u32::MAX),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!("failed to read high score, starting from 0: {e}");
                0
            }
        };
        self.persisted
    }

    /// Write `score` if it beats the stored value. Returns whether a write happened.
    pub fn record(&mut self, score: u32) -> Result<bool, StoreError> {
        if score <= self.persisted {
            return Ok(false);
        }
        self.store.set(HIGH_SCORE_KEY, u64::from(score))?;
        self.persisted = score;
        tracing::debug!(score, "high score saved");
        Ok(true)
    }

    pub fn persisted(&self) -> u32 {
        self.persisted
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}
