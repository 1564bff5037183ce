//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal driver and both renderers only ever see a [`GameState`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, MAX_GRID_SIDE};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{GameOverReason, GameState, Phase, Position, Snake};
