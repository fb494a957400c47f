//! Minimum-interval rate limiter shared by every caller of one resource.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Enforces a minimum gap between permitted calls.
///
/// The lock is held while sleeping, so callers are admitted one at a time
/// and consecutive permits are never closer than `min_interval`.
#[derive(Debug)]
pub struct RateLimiter {
    last_permit: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_permit: Mutex::new(None),
            min_interval,
        }
    }

    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for a permit. Returns the instant it was granted.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_permit.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if Instant::now() < ready_at {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "Rate limited");
                tokio::time::sleep_until(ready_at).await;
            }
        }
        let now = Instant::now();
        *last = Some(now);
        now
    }
}
