//! Bounded exponential backoff for operations that fail while a dependency is
//! still starting up.
//!
//! The budget is wall-clock: each sleep is clamped to what is left of
//! `max_elapsed`, so a caller waits at most `max_elapsed` plus the duration of
//! the final attempt.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Exponential backoff policy.
///
/// Immutable and reusable; every call to [`retry_with_backoff`] starts its own
/// timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays; values below 1.0 act as 1.0.
    pub multiplier: f64,
    /// Cap for a single delay.
    pub max_delay: Duration,
    /// Total time budget for one retried operation.
    pub max_elapsed: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            multiplier: 1.5,
            max_delay: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(15 * 60),
        }
    }
}

impl BackoffPolicy {
    /// Default growth with the given elapsed-time budget.
    pub fn with_max_elapsed(max_elapsed: Duration) -> Self {
        Self {
            max_elapsed,
            ..Self::default()
        }
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = budget;
        self
    }

    /// Delay to wait after the `failures`-th consecutive failure (1-based).
    ///
    /// `initial_delay * multiplier^(failures - 1)`, capped at `max_delay`.
    /// Non-decreasing in `failures`.
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exponent = i32::try_from(failures.saturating_sub(1)).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        let secs = self.initial_delay.as_secs_f64() * factor;

        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs)
    }
}

/// Terminal outcome of a retried operation that never succeeded.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts in {elapsed:?}: {last}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        #[source]
        last: E,
    },
    #[error("stopped after {attempts} attempts on a non-retryable error: {source}")]
    Permanent {
        attempts: u32,
        #[source]
        source: E,
    },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Permanent { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// The last error observed from the operation.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Permanent { source, .. } => source,
        }
    }
}

/// Retries `operation` on every error until it succeeds or the budget runs out.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &BackoffPolicy,
    operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_predicate(policy, operation, |_| true).await
}

/// Retries `operation` while `is_retryable` accepts its errors.
///
/// The operation is always invoked at least once, even with a zero budget.
pub async fn retry_with_predicate<T, E, F, Fut, P>(
    policy: &BackoffPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts = attempts.saturating_add(1);

        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    info!(
                        attempts,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "retry succeeded"
                    );
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !is_retryable(&err) {
            warn!(attempts, error = %err, "retry stopped on non-retryable error");
            return Err(RetryError::Permanent {
                attempts,
                source: err,
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.max_elapsed {
            error!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = policy.max_elapsed.as_millis() as u64,
                error = %err,
                "retry budget exhausted"
            );
            return Err(RetryError::Exhausted {
                attempts,
                elapsed,
                last: err,
            });
        }

        let delay = policy
            .delay_after(attempts)
            .min(policy.max_elapsed - elapsed);
        warn!(
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "attempt failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
