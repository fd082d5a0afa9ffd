//! Minimum spacing between requests issued by one client.
//!
//! Unlike a per-domain limiter, every request from the owning client counts
//! against the same clock: the archive is a single site and the run is
//! sequential. The timestamp sits behind an async mutex so a shared client
//! still spaces its requests correctly.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Enforces a minimum delay between consecutive requests.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    /// `None` until the first request; the first request is never delayed.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter. A zero delay disables limiting.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits until at least `delay` has passed since the previous call, then
    /// records the current time as the latest request.
    #[instrument(level = "trace", skip(self))]
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if !self.delay.is_zero()
            && let Some(previous) = *last_request
        {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                let wait = self.delay.saturating_sub(elapsed);
                debug!(wait_ms = wait.as_millis(), "applying rate limit delay");
                tokio::time::sleep(wait).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}
