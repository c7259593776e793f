//! Exponential-backoff retry for network operations.

use log::{debug, error, info, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How often, and how patiently, an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: usize,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after every failed attempt.
    pub backoff: f64,
}

impl RetryPolicy {
    /// Policy for creating submissions.
    pub const SUBMIT: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1000),
        backoff: 2.0,
    };

    /// Policy for fetching submission state, used on every poll.
    pub const FETCH: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(500),
        backoff: 1.5,
    };

    pub fn new(max_attempts: usize, initial_delay: Duration, backoff: f64) -> Self {
        Self {
            max_attempts,
            initial_delay,
            backoff,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Number of attempts actually made; a zero budget still runs once.
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Delay slept after the given failed attempt (1-based):
    /// `initial_delay * backoff^(attempt - 1)`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
        let factor = self.backoff.max(0.0).powi(exponent);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::SUBMIT
    }
}

/// Runs `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the attempt budget is spent.
///
/// Between attempts the task sleeps for the policy's current delay, which then
/// grows by `backoff`. The error of the last attempt is returned as-is.
pub async fn with_retry<T, E, F, Fut, P>(
    operation_name: &str,
    policy: &RetryPolicy,
    is_retryable: P,
    operation: F,
) -> Result<T, E>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        debug!("{}: attempt {}/{}", operation_name, attempt, max_attempts);

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("{}: succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if attempt >= max_attempts {
                    error!(
                        "{}: failed after {} attempts: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:.1}s...",
                    operation_name,
                    attempt,
                    max_attempts,
                    e,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
