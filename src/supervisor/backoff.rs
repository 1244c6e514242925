//! Backoff policy and failure tracking for reconnects.
//!
//! Delays by consecutive failure count:
//!
//! | Failure | Delay |
//! |---------|-------|
//! | 1st | none |
//! | 2nd | 15s |
//! | 3rd - 10th | 60s |
//! | 11th onward | 600s |
//!
//! A failure more than an hour after the previous one starts the count over.

use std::time::{Duration, Instant};

use tracing::debug;

/// Failures beyond this count use the huge delay.
pub const HUGE_BACKOFF_AFTER: u32 = 10;

/// Reconnect delays and the failure forgiveness window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Failures further apart than this are unrelated (default: 1 hour)
    pub forgiveness: Duration,
    /// Delay after the second consecutive failure (default: 15s)
    pub small: Duration,
    /// Delay after the third through tenth failure (default: 60s)
    pub large: Duration,
    /// Delay after more than ten failures (default: 600s)
    pub huge: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        let small = Duration::from_secs(15);
        let large = small * 4;
        Self {
            forgiveness: Duration::from_secs(60 * 60),
            small,
            large,
            huge: large * 10,
        }
    }
}

impl BackoffPolicy {
    /// Delay to apply after the `failure_count`-th consecutive failure.
    pub fn delay_for(&self, failure_count: u32) -> Duration {
        match failure_count {
            0 | 1 => Duration::ZERO,
            2 => self.small,
            n if n > HUGE_BACKOFF_AFTER => self.huge,
            _ => self.large,
        }
    }
}

/// Counts consecutive connection failures.
#[derive(Debug, Clone)]
pub struct FailureTracker {
    policy: BackoffPolicy,
    failure_count: u32,
    last_failure: Instant,
}

impl FailureTracker {
    /// Start tracking. `started` acts as the previous failure time, so a
    /// failure within the forgiveness window of startup counts as the first.
    pub fn new(policy: BackoffPolicy, started: Instant) -> Self {
        Self {
            policy,
            failure_count: 0,
            last_failure: started,
        }
    }

    /// Consecutive failures recorded so far.
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Time of the most recent failure (or of startup).
    pub fn last_failure(&self) -> Instant {
        self.last_failure
    }

    /// Record a failure at `now` and return how long to wait before reconnecting.
    pub fn record_failure(&mut self, now: Instant) -> Duration {
        let since_last = now.saturating_duration_since(self.last_failure);
        if since_last > self.policy.forgiveness && self.failure_count > 0 {
            debug!(
                "Forgiving {} earlier failures, last one was {}s ago",
                self.failure_count,
                since_last.as_secs()
            );
            self.failure_count = 0;
        }

        self.last_failure = now;
        self.failure_count = self.failure_count.saturating_add(1);
        self.policy.delay_for(self.failure_count)
    }
}
