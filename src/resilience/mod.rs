//! Bounded retry with capped exponential backoff
//!
//! Wraps a fallible async operation. A classifier decides whether an error is
//! worth another attempt; fatal errors are returned on the spot.

use crate::error::PlanningError;
use crate::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Retryable,
    Fatal,
}

/// Backoff schedule and attempt cap
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the uniform random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows failed attempt `attempt` (0-based), without jitter
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// Classification used for the narrative collaborator
pub fn classify_narrative_error(err: &PlanningError) -> ErrorClass {
    if err.is_transient() {
        ErrorClass::Retryable
    } else {
        ErrorClass::Fatal
    }
}

pub struct ResilientInvoker {
    policy: RetryPolicy,
}

impl ResilientInvoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails fatally, or attempts run out
    ///
    /// Exhaustion yields `PlanningError::RetriesExhausted` wrapping the last error.
    pub async fn invoke<T, F, Fut, C>(&self, mut operation: F, classify: C) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        C: Fn(&PlanningError) -> ErrorClass,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempts = attempt + 1, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if classify(&err) == ErrorClass::Fatal {
                debug!(attempt = attempt + 1, error = %err, "Fatal error, not retrying");
                return Err(err);
            }

            attempt += 1;
            if attempt >= max_attempts {
                warn!(attempts = attempt, error = %err, "Retries exhausted");
                return Err(PlanningError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.policy.backoff_delay(attempt - 1) + self.policy.jitter();
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retryable error, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for ResilientInvoker {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
