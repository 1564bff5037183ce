//! Grid Snake - a terminal Snake game
//!
//! This library provides:
//! - Deterministic game engine (game module)
//! - Two interchangeable renderers (render module)
//! - Keyboard mapping (input module)
//! - High-score persistence (persist module)
//! - The tick timer and the interactive driver (timing, modes)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod persist;
pub mod render;
pub mod timing;
