//! Bounded retry with exponential backoff.
//!
//! Every failure is retried the same way, whatever the error is. Backoff
//! doubles from the base delay and carries no jitter.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry; each later retry waits twice as long.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Wait before retry number `attempt + 1` (`attempt` counts from 0).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Total time spent sleeping when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries).fold(Duration::ZERO, |acc, attempt| {
            acc.saturating_add(self.backoff(attempt))
        })
    }

    /// Run `operation` up to `max_retries + 1` times, returning the first
    /// success or the last error unchanged.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    let backoff = self.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Request failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// `RetryPolicy::run` with explicit limits.
pub async fn retry<T, E, F, Fut>(
    operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    RetryPolicy::new(max_retries, base_delay).run(operation).await
}
