//! Retry policy value object.
//!
//! Polling call sites take a [`RetryPolicy`] instead of hard-coding their
//! own interval and attempt count, so "catch, log, retry" behavior is
//! configured in one place.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay between attempts.
    pub interval: Duration,
    /// Total number of attempts, the first one included.
    pub max_attempts: usize,
}

impl RetryPolicy {
    pub const fn new(interval: Duration, max_attempts: usize) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// A single attempt, no retries.
    pub const fn once() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    /// The waits to insert between attempts: one fewer than the number of
    /// attempts. Feed this to a retry driver.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> {
        std::iter::repeat(self.interval).take(self.max_attempts.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    /// Matches the balance-polling cadence used by the claim flow.
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_is_one_less_than_attempts() {
        let policy = RetryPolicy::new(Duration::from_millis(100), 3);
        assert_eq!(policy.intervals().count(), 2);
    }

    #[test]
    fn once_never_waits() {
        assert_eq!(RetryPolicy::once().intervals().count(), 0);
    }
}
