use std::time::Duration;

/// Default pause between records; Nominatim's usage policy allows one request per second.
pub const DEFAULT_RECORD_DELAY: Duration = Duration::from_millis(1000);

/// Spaces out records so the shared upstream quota is not exceeded.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    pauses: usize,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pauses: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of completed [`pause`](Self::pause) calls.
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    /// Waits the full interval, counted from now.
    pub async fn pause(&mut self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
        self.pauses += 1;
    }
}
