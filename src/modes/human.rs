use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameEngine, GameState, Phase, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persist::HighScores;
use crate::render::{Renderer, Scene};
use crate::timing::Ticker;

/// Keyboard-driven play in the terminal.
///
/// Owns the single [`GameState`]; the ticker drives [`GameEngine::advance`] and
/// key presses only queue directions or change the phase.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    high_scores: HighScores,
    metrics: GameMetrics,
    renderer: Box<dyn Renderer>,
    input_handler: InputHandler,
    should_quit: bool,
    game_over_at: Option<Instant>,
}

impl HumanMode {
    pub fn new(
        mut engine: GameEngine,
        mut high_scores: HighScores,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let high_score = high_scores.load();
        let state = engine.idle(high_score);

        Self {
            engine,
            state,
            high_scores,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            game_over_at: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        tracing::info!(
            renderer = self.renderer.name(),
            width = self.state.grid_width,
            height = self.state.grid_height,
            high_score = self.state.high_score,
            "session started"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        tracing::info!(games = self.metrics.games_played, best = self.metrics.best_score, "session ended");

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut ticker = Ticker::stopped(self.state.tick_interval);

        // The clock and overlay expiry only need a slow refresh; ticks and
        // key presses redraw immediately.
        let mut refresh_timer = interval(Duration::from_millis(250));

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if self.handle_event(event) {
                                self.draw(terminal)?;
                            }
                        }
                        Some(Err(e)) => {
                            return Err(e).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = ticker.tick() => {
                    self.on_tick();
                    self.draw(terminal)?;
                }

                _ = refresh_timer.tick() => {
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            sync_ticker(&self.state, &mut ticker);
        }

        Ok(())
    }

    /// Returns whether the screen needs a redraw
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                let action = self.input_handler.handle_key_event(key);
                self.apply(action);
                action != KeyAction::None
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn apply(&mut self, action: KeyAction) {
        let before = self.state.phase;

        match action {
            KeyAction::Steer(direction) => {
                self.engine.set_pending_direction(&mut self.state, direction);
            }
            KeyAction::TogglePause => {
                self.engine.toggle_pause(&mut self.state);
            }
            KeyAction::Restart => {
                // An abandoned game still counts towards the session
                if matches!(self.state.phase, Phase::Running | Phase::Paused) {
                    self.metrics.on_game_over(self.state.score);
                }
                self.engine.restart(&mut self.state);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        self.track_phase(before, action == KeyAction::Restart);
    }

    fn track_phase(&mut self, before: Phase, restarted: bool) {
        let after = self.state.phase;

        match (before, after) {
            (_, Phase::Running) if restarted => self.on_new_game(),
            (Phase::Idle | Phase::GameOver(_), Phase::Running) => self.on_new_game(),
            (Phase::Running, Phase::Paused) => self.metrics.on_pause(),
            (Phase::Paused, Phase::Running) => self.metrics.on_resume(),
            _ => {}
        }
    }

    fn on_new_game(&mut self) {
        self.metrics.on_game_start();
        self.game_over_at = None;
    }

    fn on_tick(&mut self) -> TickOutcome {
        let outcome = self.engine.advance(&mut self.state);

        match outcome {
            TickOutcome::Ate { .. } => self.persist_high_score(),
            TickOutcome::GameOver(_) if self.game_over_at.is_none() => {
                self.persist_high_score();
                self.metrics.on_game_over(self.state.score);
                self.game_over_at = Some(Instant::now());
            }
            _ => {}
        }

        outcome
    }

    fn persist_high_score(&mut self) {
        if let Err(e) = self.high_scores.record(self.state.high_score) {
            tracing::warn!("failed to save high score {}: {e}", self.state.high_score);
        }
    }

    fn show_game_over(&self, now: Instant) -> bool {
        let Some(ended) = self.game_over_at else {
            return false;
        };
        match self.renderer.game_over_duration() {
            Some(duration) => now.saturating_duration_since(ended) < duration,
            None => true,
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics.update();
        let scene = Scene {
            state: &self.state,
            metrics: &self.metrics,
            show_game_over: self.show_game_over(Instant::now()),
        };
        let renderer = &self.renderer;

        terminal
            .draw(|frame| {
                let area = frame.area();
                renderer.render(area, frame.buffer_mut(), &scene);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Keep the ticker's period and activity in line with the state
fn sync_ticker(state: &GameState, ticker: &mut Ticker) {
    if state.is_running() {
        if ticker.set_period(state.tick_interval) {
            tracing::debug!(tick_ms = state.tick_interval.as_millis() as u64, "tick interval changed");
        }
        ticker.start();
    } else {
        ticker.stop();
    }
}
