//! Minimum-interval rate limiter
//!
//! Every call to [`RateLimiter::throttle`] is one dispatch. A dispatch may
//! not happen earlier than `min_interval` after the previous one; callers
//! that arrive too early are suspended (without blocking the runtime) until
//! the next slot opens. No jitter, no backoff.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Configuration for [`RateLimiter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum time between two consecutive dispatches
    pub min_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self { min_interval: Duration::from_millis(333) }
    }
}

impl RateLimiterConfig {
    /// Upper bound for `min_interval`; anything longer is a misconfiguration.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(60);

    /// Configuration from a millisecond interval.
    pub fn from_millis(millis: u64) -> Self {
        Self { min_interval: Duration::from_millis(millis) }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_interval > Self::MAX_INTERVAL {
            return Err(format!(
                "min_interval must be at most {}ms",
                Self::MAX_INTERVAL.as_millis()
            ));
        }
        Ok(())
    }
}

/// Shared minimum-interval limiter
///
/// The lock is held while sleeping, so concurrent callers are released one
/// at a time in lock acquisition order.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use rosterlink_common::resilience::{RateLimiter, RateLimiterConfig};
///
/// # async fn example() -> Result<(), String> {
/// let limiter = RateLimiter::new(RateLimiterConfig::from_millis(333))?;
/// limiter.throttle().await;
/// limiter.throttle().await; // resumes ~333ms after the first dispatch
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_available: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter whose first dispatch is immediate.
    pub fn new(config: RateLimiterConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::with_interval(config.min_interval))
    }

    fn with_interval(min_interval: Duration) -> Self {
        Self { min_interval, next_available: Mutex::new(None) }
    }

    /// Minimum time between two dispatches.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the next dispatch slot and claim it.
    ///
    /// Returns the dispatch instant. Must be the last step before the
    /// request is sent.
    pub async fn throttle(&self) -> Instant {
        let mut next_available = self.next_available.lock().await;

        if let Some(at) = *next_available {
            let now = Instant::now();
            if now < at {
                debug!(wait_ms = (at - now).as_millis() as u64, "Rate limit: waiting for slot");
                sleep_until(at).await;
            }
        }

        let dispatched_at = Instant::now();
        *next_available = Some(dispatched_at + self.min_interval);
        dispatched_at
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_interval(RateLimiterConfig::default().min_interval)
    }
}
