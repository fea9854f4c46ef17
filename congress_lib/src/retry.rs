//! Caller-side retry with exponential backoff.
//!
//! Nothing in the gateway retries on its own. Callers that want it wrap a
//! call in [`with_retry`]; only [`GatewayError::is_retryable`] errors are
//! retried, so an exhausted rate budget fails immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::GatewayError;

pub const RETRY_MAX_VAR: &str = "CONGRESS_RETRY_MAX";
pub const RETRY_BASE_MS_VAR: &str = "CONGRESS_RETRY_BASE_MS";
pub const RETRY_MAX_MS_VAR: &str = "CONGRESS_RETRY_MAX_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_parse(RETRY_MAX_VAR, defaults.max_retries),
            base_delay_ms: env_parse(RETRY_BASE_MS_VAR, defaults.base_delay_ms),
            max_delay_ms: env_parse(RETRY_MAX_MS_VAR, defaults.max_delay_ms),
        }
    }

    /// Backoff before retry number `attempt` (1-based), with +/-20% jitter.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up. Each attempt spends its own rate budget.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut f: F,
) -> Result<T, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let mut attempt = 0usize;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt > policy.max_retries || !err.is_retryable() {
                    return Err(err);
                }
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:.1}s",
                    label,
                    attempt,
                    policy.max_retries,
                    err,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[test]
    fn delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 1000,
        };
        let first = policy.delay_for_attempt(1).as_millis();
        let third = policy.delay_for_attempt(3).as_millis();
        let tenth = policy.delay_for_attempt(10).as_millis();
        assert!((80..120).contains(&first), "{}", first);
        assert!((320..480).contains(&third), "{}", third);
        assert!(tenth < 1200, "{}", tenth);
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = with_retry(&fast(3), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(GatewayError::Transient("timeout".into()))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(&fast(2), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::Api {
                status: 503,
                body: String::new(),
            })
        })
        .await;
        assert!(matches!(result, Err(GatewayError::Api { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rate_limit_is_never_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(&fast(5), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::RateLimitExceeded {
                count: 5000,
                limit: 5000,
            })
        })
        .await;
        assert!(matches!(result, Err(GatewayError::RateLimitExceeded { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(&fast(5), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::Api {
                status: 400,
                body: String::new(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_policy_makes_one_attempt() {
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
