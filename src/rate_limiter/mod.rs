use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Keeps a minimum spacing between consecutive requests to the provider
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.next_slot() {
            sleep_until(ready_at).await;
        }
        self.last_request = Some(Instant::now());
    }

    fn next_slot(&self) -> Option<Instant> {
        self.last_request
            .map(|last| last + self.delay)
            .filter(|ready_at| *ready_at > Instant::now())
    }
}
