//! Retry policy and executor
//!
//! Retries are decided purely by [`Retryable::is_retryable`], never by the
//! kind of operation. A non-idempotent request (a create or an update) that
//! fails on the wire after the server already applied it will be sent again,
//! so callers that care about duplicate side effects must guard against them
//! themselves.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Fixed delay between attempts
    #[serde(with = "humantime_serde")]
    pub delay: Duration,

    /// Whether to add ±20% jitter to the delay
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Fixed-delay policy
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            jitter: false,
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Delay before the attempt following `attempt`
    pub fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        if self.jitter && !self.delay.is_zero() {
            let factor = rand::thread_rng().gen_range(0.8..1.2);
            Duration::from_nanos((self.delay.as_nanos() as f64 * factor) as u64)
        } else {
            self.delay
        }
    }
}

/// Trait for errors that can be retried
pub trait Retryable {
    /// Whether this error is retryable
    fn is_retryable(&self) -> bool;

    /// Custom retry delay for this error type
    fn retry_delay(&self) -> Option<Duration> {
        None
    }
}

/// Retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create a new retry executor with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Create with default policy
    pub fn with_default_policy() -> Self {
        Self::new(RetryPolicy::default())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a function with retry logic
    pub async fn execute<F, Fut, T, E>(&self, mut f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        self.execute_with_context(|_attempt| f()).await
    }

    /// Execute a function with retry logic and attempt context
    pub async fn execute_with_context<F, Fut, T, E>(&self, mut f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        let mut attempt = 1;

        loop {
            debug!(
                "Executing attempt {} of {}",
                attempt, self.policy.max_attempts
            );

            match f(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        info!("Operation succeeded after {} attempts", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        debug!("Operation failed with non-retryable error: {}", error);
                        return Err(RetryError::NonRetryableError(error));
                    }

                    if attempt >= self.policy.max_attempts {
                        warn!("Operation failed after {} attempts: {}", attempt, error);
                        return Err(RetryError::MaxAttemptsExceeded {
                            attempts: attempt,
                            last_error: error,
                        });
                    }

                    let delay = error
                        .retry_delay()
                        .unwrap_or_else(|| self.policy.delay_for_attempt(attempt));

                    debug!(
                        "Attempt {} failed: {}. Retrying in {:?}",
                        attempt, error, delay
                    );
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }

                    attempt += 1;
                }
            }
        }
    }
}

/// Retry error types
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts ({attempts}) exceeded. Last error: {last_error}")]
    MaxAttemptsExceeded { attempts: u32, last_error: E },

    /// Non-retryable error encountered
    #[error("Non-retryable error: {0}")]
    NonRetryableError(E),
}

impl<E> RetryError<E> {
    /// Get the underlying error
    pub fn into_inner(self) -> E {
        match self {
            RetryError::MaxAttemptsExceeded { last_error, .. } => last_error,
            RetryError::NonRetryableError(error) => error,
        }
    }

    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::MaxAttemptsExceeded { attempts, .. } => *attempts,
            RetryError::NonRetryableError(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct TestError {
        retryable: bool,
        message: String,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let executor = RetryExecutor::new(RetryPolicy::fixed(3, Duration::from_millis(10)));

        let result = executor
            .execute(|| {
                let count = counter_clone.fetch_add(1, Ordering::Relaxed);
                async move {
                    if count < 2 {
                        Err(TestError {
                            retryable: true,
                            message: "Temporary failure".to_string(),
                        })
                    } else {
                        Ok("Success".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "Success");
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_retry_max_attempts_exceeded() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let executor = RetryExecutor::new(RetryPolicy::fixed(2, Duration::from_millis(1)));

        let result: Result<(), RetryError<TestError>> = executor
            .execute(|| {
                counter_clone.fetch_add(1, Ordering::Relaxed);
                async {
                    Err(TestError {
                        retryable: true,
                        message: "Always fails".to_string(),
                    })
                }
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::MaxAttemptsExceeded { attempts: 2, .. }));
        assert_eq!(err.into_inner().message, "Always fails");
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let executor = RetryExecutor::with_default_policy();

        let result: Result<(), RetryError<TestError>> = executor
            .execute(|| {
                counter_clone.fetch_add(1, Ordering::Relaxed);
                async {
                    Err(TestError {
                        retryable: false,
                        message: "Non-retryable".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result.unwrap_err(), RetryError::NonRetryableError(_)));
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let executor = RetryExecutor::new(RetryPolicy::fixed(3, Duration::from_secs(2)));
        let started = tokio::time::Instant::now();

        let result: Result<(), RetryError<TestError>> = executor
            .execute(|| async {
                Err(TestError {
                    retryable: true,
                    message: "down".to_string(),
                })
            })
            .await;

        assert!(result.is_err());
        // Two waits between three attempts
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_execute_with_context() {
        let executor = RetryExecutor::new(RetryPolicy::fixed(3, Duration::from_millis(1)));

        let result = executor
            .execute_with_context(|attempt| async move {
                if attempt < 3 {
                    Err(TestError {
                        retryable: true,
                        message: format!("Attempt {}", attempt),
                    })
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
            jitter: true,
        };
        for attempt in 1..20 {
            let delay = policy.delay_for_attempt(attempt);
            assert!(delay >= Duration::from_millis(800));
            assert!(delay <= Duration::from_millis(1200));
        }
    }

    #[test]
    fn test_policy_serde_uses_humantime() {
        let policy = RetryPolicy::fixed(4, Duration::from_millis(250));
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["delay"], "250ms");
        let parsed: RetryPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, policy);
    }
}
