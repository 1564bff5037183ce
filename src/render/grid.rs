use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::{hud, Renderer, Scene};
use crate::game::{GameState, Position};

/// Glyph-per-cell board
pub struct GridRenderer;

impl GridRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }
}

impl Renderer for GridRenderer {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn game_over_duration(&self) -> Option<Duration> {
        None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, scene: &Scene<'_>) {
        let state = scene.state;
        let [header, body, footer] = hud::split(area);

        hud::stats(state, scene.metrics).render(header, buf);

        let board_width = (state.grid_width as u16).saturating_mul(2).saturating_add(2);
        let board_height = (state.grid_height as u16).saturating_add(2);
        let board = hud::centered(body, board_width, board_height);
        self.render_grid(state).render(board, buf);

        if let Some(banner) = hud::status_banner(state.phase) {
            let banner_area = hud::centered(board, banner.chars().count() as u16, 1);
            Clear.render(banner_area, buf);
            Paragraph::new(banner)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Black).bg(Color::Yellow))
                .render(banner_area, buf);
        }

        if state.is_over() && scene.show_game_over {
            let (width, height) = hud::GAME_OVER_PANEL_SIZE;
            let panel = hud::centered(body, width, height);
            Clear.render(panel, buf);
            hud::game_over_panel(state).render(panel, buf);
        }

        hud::controls(state.phase).render(footer, buf);
    }
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new()
    }
}
