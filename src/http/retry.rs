//! Fixed-interval retry executor
//!
//! Runs a fallible async operation up to a configured number of attempts,
//! sleeping a constant delay between a failure and the next attempt. Both
//! the attempt and the sleep race the caller's cancellation token.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Which failures earn another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Retry every failure
    #[default]
    Always,
    /// Retry only transport errors and 408/429/5xx responses
    RetryableOnly,
}

impl RetryPolicy {
    /// Decide whether `error` should be retried. Cancellation never is.
    pub fn should_retry(self, error: &Error) -> bool {
        if error.is_cancelled() {
            return false;
        }
        match self {
            RetryPolicy::Always => true,
            RetryPolicy::RetryableOnly => error.is_retryable(),
        }
    }
}

/// Attempt limit and delay for the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
}

impl ExecutorConfig {
    /// Create a config; zero attempts is raised to one
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Runs operations with bounded, fixed-delay retries
#[derive(Debug, Clone, Default)]
pub struct RetryingExecutor {
    config: ExecutorConfig,
    policy: RetryPolicy,
}

impl RetryingExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run `operation` until it succeeds, the attempts run out, or `cancel` fires.
    ///
    /// On exhaustion the error of the final attempt is returned unchanged.
    /// Cancellation yields [`Error::Cancelled`] without starting another attempt.
    pub async fn run<F, Fut, T>(&self, cancel: &CancellationToken, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            debug!("Executing attempt {}/{}", attempt, max_attempts);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded after {} attempts", attempt);
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts {
                warn!(
                    "All {} attempts failed, last error: {}",
                    max_attempts, error
                );
                return Err(error);
            }

            if !self.policy.should_retry(&error) {
                debug!("Not retrying: {}", error);
                return Err(error);
            }

            warn!(
                "Attempt {}/{} failed, retrying in {:?}: {}",
                attempt, max_attempts, self.config.delay, error
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(self.config.delay) => {}
            }

            attempt += 1;
        }
    }
}
