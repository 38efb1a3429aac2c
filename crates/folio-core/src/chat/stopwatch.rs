use std::time::Duration;

use tokio::time::Instant;

/// Tick interval for elapsed-time displays
pub const TICK: Duration = Duration::from_millis(100);

/// Measures one turn from submit until it completes, aborts or fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    stopped: Option<Duration>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from zero.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.stopped = None;
    }

    /// Freeze the reading. Stopping twice keeps the first reading.
    pub fn stop(&mut self) -> Duration {
        if self.stopped.is_none() {
            self.stopped = Some(self.running_for());
        }
        self.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped.is_none()
    }

    /// Elapsed time, truncated to the tick resolution.
    pub fn elapsed(&self) -> Duration {
        let raw = self.stopped.unwrap_or_else(|| self.running_for());
        let ticks = raw.as_millis() / TICK.as_millis();
        Duration::from_millis((ticks * TICK.as_millis()) as u64)
    }

    fn running_for(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }
}

/// Render a duration the way the chat shows it, e.g. `2.3s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}
