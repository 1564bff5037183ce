use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Cancellable repeating timer for game ticks.
///
/// Changing the period rebuilds the underlying interval, so the next tick is
/// always one full new period away. A stopped ticker never fires.
pub struct Ticker {
    interval: Interval,
    period: Duration,
    active: bool,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            interval: schedule(period),
            period,
            active: true,
        }
    }

    /// Create a ticker that stays silent until [`Ticker::start`]
    pub fn stopped(period: Duration) -> Self {
        let mut ticker = Self::new(period);
        ticker.active = false;
        ticker
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to a new period. Returns false if the period was unchanged.
    pub fn set_period(&mut self, period: Duration) -> bool {
        let period = period.max(MIN_PERIOD);
        if period == self.period {
            return false;
        }
        self.period = period;
        self.interval = schedule(period);
        true
    }

    /// Cancel pending ticks
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Resume ticking, first tick one period from now
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.interval = schedule(self.period);
    }

    /// Wait for the next tick. Never completes while stopped.
    pub async fn tick(&mut self) {
        if !self.active {
            std::future::pending::<()>().await;
        }
        self.interval.tick().await;
    }
}

fn schedule(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
