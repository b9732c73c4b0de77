//! Bounded retry with linear backoff for the fetch stage.
//!
//! Every fetch failure (timeout, connection error, bad status, bad payload)
//! is treated as retryable; the budget is small and the job is rescheduled
//! externally anyway.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Wait before retry N is `base_delay * N`.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(DEFAULT_BASE_DELAY_SECS),
        }
    }
}

impl RetryConfig {
    /// Linear backoff: the wait after `completed` failed attempts.
    pub fn delay_after(&self, completed: u32) -> Duration {
        self.base_delay * completed
    }
}

/// Run `operation` until it succeeds or the attempt budget is exhausted,
/// sleeping linearly longer between attempts. Returns the last error on
/// exhaustion. The closure receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 1..=config.max_attempts {
        if attempt > 1 {
            let delay = config.delay_after(attempt - 1);
            tracing::info!(attempt, ?delay, "retrying after backoff");
            tokio::time::sleep(delay).await;
        }

        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(attempt, max = config.max_attempts, error = %e, "attempt failed");
                last_error = Some(e);
            }
        }
    }

    tracing::error!(attempts = config.max_attempts, "all attempts exhausted");
    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("retry budget of zero attempts")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn backoff_is_linear() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_after(1), Duration::from_secs(5));
        assert_eq!(config.delay_after(2), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn two_failures_then_success_takes_three_attempts() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(anyhow!("simulated timeout"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_retry(&fast(), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(anyhow!("failure {n}")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(result.unwrap_err().to_string().contains("failure 3"));
    }

    #[tokio::test]
    async fn immediate_success_makes_one_attempt() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(attempt) }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
