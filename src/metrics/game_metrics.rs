use std::time::{Duration, Instant};

/// Per-session statistics shown next to the board
pub struct GameMetrics {
    /// Play time of finished running stretches in the current game
    accumulated: Duration,
    /// Set while the game is running
    running_since: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: None,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        self.elapsed_time = self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
    }

    pub fn on_game_start(&mut self) {
        self.on_game_start_at(Instant::now());
    }

    pub fn on_game_start_at(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn on_pause(&mut self) {
        self.on_pause_at(Instant::now());
    }

    pub fn on_pause_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
        self.elapsed_time = self.accumulated;
    }

    pub fn on_resume(&mut self) {
        self.on_resume_at(Instant::now());
    }

    pub fn on_resume_at(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_pause();
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
