use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side accepted by [`GameConfig::validate`]. Positions are `i32`
/// and renderers lay the board out in `u16` terminal cells.
pub const MAX_GRID_SIDE: usize = 1024;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid {width}x{height} cannot hold a snake of length {length} plus food")]
    GridTooSmall {
        width: usize,
        height: usize,
        length: usize,
    },
    #[error("grid {width}x{height} exceeds the {max}x{max} limit")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("initial_snake_length must be at least 1")]
    EmptySnake,
    #[error("min_tick_ms must be at least 1")]
    ZeroTick,
    #[error("min_tick_ms ({min}) cannot exceed initial_tick_ms ({initial})")]
    TickFloorAboveStart { min: u64, initial: u64 },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food
    pub food_score: u32,

    // Speed
    /// Tick interval at the start of a game
    pub initial_tick_ms: u64,
    /// How much the tick interval shrinks per food
    pub tick_decrement_ms: u64,
    /// The tick interval never drops below this
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            food_score: 10,
            initial_tick_ms: 100,
            tick_decrement_ms: 5,
            min_tick_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Check that a game can actually be played with these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        // The initial snake is horizontal and food needs one free cell.
        if self.grid_width <= self.initial_snake_length || self.grid_height == 0 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                length: self.initial_snake_length,
            });
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIDE,
            });
        }

        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }

        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::TickFloorAboveStart {
                min: self.min_tick_ms,
                initial: self.initial_tick_ms,
            });
        }

        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    /// Tick interval after one more food has been eaten at `current`
    pub fn next_tick(&self, current: Duration) -> Duration {
        let floor = Duration::from_millis(self.min_tick_ms);
        if current > floor {
            current
                .saturating_sub(Duration::from_millis(self.tick_decrement_ms))
                .max(floor)
        } else {
            current
        }
    }
}
