use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Widget},
};

use super::{hud, Renderer, Scene};
use crate::game::Position;

const BACKGROUND: Color = Color::Rgb(34, 34, 34);
const HEAD: Color = Color::Rgb(76, 175, 80);
const BODY: Color = Color::Rgb(139, 195, 74);
const FOOD: Color = Color::Rgb(255, 87, 34);
const SHADE: Color = Color::Rgb(12, 12, 12);

/// Terminal columns per grid cell, so cells come out roughly square
const CELL_WIDTH: u16 = 2;

const GAME_OVER_DURATION: Duration = Duration::from_millis(3000);

/// Solid filled cells painted straight into the buffer
pub struct CanvasRenderer;

impl CanvasRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Board area, in terminal cells
struct Board<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Board<'_> {
    fn fill_cell(&mut self, pos: Position, color: Color) {
        let (Ok(gx), Ok(gy)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        let Some(x) = gx
            .checked_mul(CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(gy) else {
            return;
        };
        if y >= self.area.bottom() {
            return;
        }

        for dx in 0..CELL_WIDTH {
            let Some(cx) = x.checked_add(dx) else {
                return;
            };
            if cx >= self.area.right() {
                return;
            }
            if let Some(cell) = self.buf.cell_mut((cx, y)) {
                cell.set_char(' ');
                cell.set_style(Style::reset().bg(color));
            }
        }
    }

    fn shade(&mut self) {
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_char(' ');
                    cell.set_style(Style::reset().bg(SHADE));
                }
            }
        }
    }

    fn text(&mut self, row: u16, line: Line<'_>) {
        let y = self.area.y.saturating_add(row);
        if y >= self.area.bottom() {
            return;
        }
        let area = Rect::new(self.area.x, y, self.area.width, 1);
        line.alignment(Alignment::Center).render(area, self.buf);
    }
}

impl Renderer for CanvasRenderer {
    fn name(&self) -> &'static str {
        "canvas"
    }

    fn game_over_duration(&self) -> Option<Duration> {
        Some(GAME_OVER_DURATION)
    }

    fn render(&self, area: Rect, buf: &mut Buffer, scene: &Scene<'_>) {
        let state = scene.state;
        let [header, body, footer] = hud::split(area);

        hud::stats(state, scene.metrics).render(header, buf);

        let board_width = (state.grid_width as u16)
            .saturating_mul(CELL_WIDTH)
            .saturating_add(2);
        let board_height = (state.grid_height as u16).saturating_add(2);
        let frame = hud::centered(body, board_width, board_height);
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .render(frame, buf);

        let mut board = Board {
            area: frame.inner(Margin::new(1, 1)),
            buf,
        };

        for y in 0..state.grid_height as i32 {
            for x in 0..state.grid_width as i32 {
                board.fill_cell(Position::new(x, y), BACKGROUND);
            }
        }
        board.fill_cell(state.food, FOOD);
        for &segment in state.snake.body_segments() {
            board.fill_cell(segment, BODY);
        }
        // Head last so it is never hidden
        board.fill_cell(state.snake.head(), HEAD);

        let middle = board.area.height / 2;
        if let Some(banner) = hud::status_banner(state.phase) {
            board.text(
                middle,
                Line::from(Span::styled(
                    banner,
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                )),
            );
        }

        if state.is_over() && scene.show_game_over {
            board.shade();
            let bold_white = Style::default()
                .fg(Color::White)
                .bg(SHADE)
                .add_modifier(Modifier::BOLD);
            board.text(middle.saturating_sub(1), Line::styled("Game Over!", bold_white));
            board.text(
                middle.saturating_add(1),
                Line::styled(
                    format!("Score: {}", state.score),
                    Style::default().fg(Color::White).bg(SHADE),
                ),
            );
        }

        hud::controls(state.phase).render(footer, buf);
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new()
    }
}
