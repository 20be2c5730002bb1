//! Retry for model backend calls: a fixed attempt budget with a delay that
//! doubles after every failed attempt, up to a cap.
//!
//! ```rust
//! use std::time::Duration;
//! use rprovider::RetryPolicy;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.max_attempts, 3);
//! assert_eq!(policy.backoff_for_attempt(1), Duration::from_secs(1));
//! assert_eq!(policy.backoff_for_attempt(2), Duration::from_secs(2));
//! assert_eq!(policy.delay_after(3, true), None);
//! ```

use std::future::Future;
use std::time::Duration;

use crate::{ProviderError, ProviderId};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// `max_backoff` is never below `initial_backoff`; the builders keep it so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Also raises the cap when it would sit below the first delay.
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self.max_backoff = self.max_backoff.max(initial_backoff);
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff.max(self.initial_backoff);
        self
    }

    /// Delay after failed attempt `attempt` (1-based): the initial delay
    /// doubled `attempt - 1` times, capped at `max_backoff`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(1_u32 << doublings)
            .min(self.max_backoff)
    }

    /// How long to wait before another attempt, or `None` when the failure is
    /// final or the budget is spent.
    pub fn delay_after(&self, attempt: u32, retryable: bool) -> Option<Duration> {
        (retryable && attempt < self.max_attempts).then(|| self.backoff_for_attempt(attempt))
    }
}

/// Observes each backend attempt. All methods default to no-ops.
pub trait ProviderOperationHooks: Send + Sync {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {}

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {}

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

/// Calls `execute` with the 1-based attempt number until it succeeds or
/// `policy` gives up. A retryable error that outlives the budget comes back
/// as `ProviderErrorKind::RetriesExhausted`; any other error is returned as is.
pub async fn execute_with_retry<T, Op, OpFuture, Sleep, SleepFuture>(
    provider: ProviderId,
    operation: &str,
    policy: &RetryPolicy,
    hooks: &dyn ProviderOperationHooks,
    mut execute: Op,
    mut sleep: Sleep,
) -> Result<T, ProviderError>
where
    Op: FnMut(u32) -> OpFuture,
    OpFuture: Future<Output = Result<T, ProviderError>>,
    Sleep: FnMut(Duration) -> SleepFuture,
    SleepFuture: Future<Output = ()>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        hooks.on_attempt_start(provider, operation, attempt);

        let error = match execute(attempt).await {
            Ok(value) => {
                hooks.on_success(provider, operation, attempt);
                return Ok(value);
            }
            Err(error) => error,
        };

        match policy.delay_after(attempt, error.retryable) {
            Some(delay) => {
                hooks.on_retry_scheduled(provider, operation, attempt, delay, &error);
                sleep(delay).await;
            }
            None => {
                let error = if error.retryable {
                    ProviderError::retries_exhausted(attempt, &error)
                } else {
                    error
                };
                hooks.on_failure(provider, operation, attempt, &error);
                return Err(error);
            }
        }
    }
}
