//! High-score persistence
//!
//! The only state that outlives a session is a single integer kept in a
//! key-value store.

pub mod high_score;
pub mod store;

pub use high_score::{HighScores, HIGH_SCORE_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
