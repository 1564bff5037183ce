//! Presentation of a [`GameState`] snapshot.
//!
//! Two interchangeable renderers share the game engine:
//! - [`GridRenderer`]: one glyph per cell, game-over panel stays until reset
//! - [`CanvasRenderer`]: solid filled cells, game-over overlay fades after 3 s

pub mod canvas;
pub mod grid;
pub mod hud;

use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect};

use crate::game::GameState;
use crate::metrics::GameMetrics;

pub use canvas::CanvasRenderer;
pub use grid::GridRenderer;

/// Everything a renderer may look at for one frame
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub metrics: &'a GameMetrics,
    /// Whether the game-over message should be drawn
    pub show_game_over: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;

    /// How long the game-over message stays up; `None` keeps it until reset
    fn game_over_duration(&self) -> Option<Duration>;

    fn render(&self, area: Rect, buf: &mut Buffer, scene: &Scene<'_>);
}
