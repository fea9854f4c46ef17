//! Hourly request budget shared by every outbound call.
//!
//! The Congress.gov API allows 5,000 requests per hour per key. The budget
//! here is a hard ceiling: once it is spent, [`RateLimiter::check_and_reserve`]
//! fails immediately instead of queueing, and the counter only recovers when
//! the hour that started with the first request of the window has elapsed.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::Error;

/// Default hourly budget (the Congress.gov published limit).
pub const DEFAULT_LIMIT_PER_HOUR: u64 = 5000;

/// Default window duration.
const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);

/// Counter state for the current window.
#[derive(Debug, Clone, Copy)]
pub struct RateBudget {
    pub requests_this_hour: u64,
    pub hour_start: Instant,
    pub limit_per_hour: u64,
}

/// Read-only snapshot of the budget, for display and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub requests_this_hour: u64,
    pub limit_per_hour: u64,
    pub remaining: u64,
    pub is_rate_limited: bool,
    /// Time until the current window rolls over.
    pub resets_in: Duration,
}

/// Fixed-window rate limiter guarding a single [`RateBudget`].
///
/// The check and the increment happen under one lock, so concurrent
/// callers can never both observe the last free slot. The lock is never
/// held across an `.await`.
pub struct RateLimiter {
    budget: Mutex<RateBudget>,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given hourly budget.
    pub fn new(limit_per_hour: u64) -> Self {
        Self::with_window(limit_per_hour, DEFAULT_WINDOW)
    }

    /// Create a limiter with an explicit window length.
    pub fn with_window(limit_per_hour: u64, window: Duration) -> Self {
        Self {
            budget: Mutex::new(RateBudget {
                requests_this_hour: 0,
                hour_start: Instant::now(),
                limit_per_hour,
            }),
            window,
        }
    }

    /// Reserve one request slot, or fail with [`Error::RateLimitExceeded`].
    ///
    /// Rolls the window over first when it has elapsed. A failed call
    /// leaves the counter untouched.
    pub fn check_and_reserve(&self) -> Result<(), Error> {
        let now = Instant::now();
        let mut budget = self.budget.lock().unwrap_or_else(|e| e.into_inner());

        if now.duration_since(budget.hour_start) >= self.window {
            budget.requests_this_hour = 0;
            budget.hour_start = now;
        }

        if budget.requests_this_hour >= budget.limit_per_hour {
            return Err(Error::RateLimitExceeded {
                count: budget.requests_this_hour,
                limit: budget.limit_per_hour,
            });
        }

        budget.requests_this_hour += 1;
        Ok(())
    }

    /// Snapshot the current budget without reserving anything.
    pub fn status(&self) -> RateLimitStatus {
        let now = Instant::now();
        let budget = *self.budget.lock().unwrap_or_else(|e| e.into_inner());
        let elapsed = now.duration_since(budget.hour_start);

        // A window that has already elapsed would be reset by the next reservation.
        let used = if elapsed >= self.window {
            0
        } else {
            budget.requests_this_hour
        };
        RateLimitStatus {
            requests_this_hour: used,
            limit_per_hour: budget.limit_per_hour,
            remaining: budget.limit_per_hour.saturating_sub(used),
            is_rate_limited: used >= budget.limit_per_hour,
            resets_in: self.window.saturating_sub(elapsed),
        }
    }

    /// Clear the counter and start a fresh window now.
    pub fn reset(&self) {
        let mut budget = self.budget.lock().unwrap_or_else(|e| e.into_inner());
        budget.requests_this_hour = 0;
        budget.hour_start = Instant::now();
    }

    /// The configured requests per window.
    pub fn limit_per_hour(&self) -> u64 {
        self.budget
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .limit_per_hour
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT_PER_HOUR)
    }
}
