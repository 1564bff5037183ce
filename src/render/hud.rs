//! Header, footer and overlay text shared by both renderers

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::game::{GameOverReason, GameState, Phase};
use crate::metrics::GameMetrics;

/// Split the screen into header, board and footer
pub fn split(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(0),    // Game area
        Constraint::Length(2), // Footer
    ])
    .areas(area)
}

/// Center a `width` x `height` box inside `area`, clipped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    cell
}

pub fn stats(state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White);

    let text = vec![Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(
            state.score.to_string(),
            value.add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("High Score: ", label),
        Span::styled(state.high_score.to_string(), value),
        Span::raw("    "),
        Span::styled("Time: ", label),
        Span::styled(metrics.format_time(), value),
        Span::raw("    "),
        Span::styled("Games: ", label),
        Span::styled(metrics.games_played.to_string(), value),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

pub fn controls(phase: Phase) -> Paragraph<'static> {
    let toggle = match phase {
        Phase::Idle => " to start | ",
        Phase::Running => " to pause | ",
        Phase::Paused => " to resume | ",
        Phase::GameOver(_) => " to play again | ",
    };

    let text = vec![Line::from(vec![
        Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("WASD", Style::default().fg(Color::Cyan)),
        Span::raw(" to move | "),
        Span::styled("Space", Style::default().fg(Color::Cyan)),
        Span::raw(toggle),
        Span::styled("R", Style::default().fg(Color::Green)),
        Span::raw(" to reset | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

/// Banner for phases where the board is frozen, if any
pub fn status_banner(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Idle => Some(" Press Space to start "),
        Phase::Paused => Some(" Paused "),
        Phase::Running | Phase::GameOver(_) => None,
    }
}

pub fn reason_text(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::Wall => "Hit the wall",
        GameOverReason::SelfCollision => "Bit your own tail",
        GameOverReason::BoardFull => "Board cleared!",
    }
}

/// Size of the box produced by [`game_over_panel`]
pub const GAME_OVER_PANEL_SIZE: (u16, u16) = (36, 8);

pub fn game_over_panel(state: &GameState) -> Paragraph<'static> {
    let reason = state.game_over_reason().map_or("", reason_text);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]),
    ];

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
}
