//! Bounded exponential backoff for idempotent remote operations
//!
//! Only transient failures ([`SyncError::is_transient`]) are retried. Every
//! attempt and every backoff sleep races the run's [`CancellationToken`], so a
//! cancelled run stops issuing requests immediately.

use std::future::Future;
use std::time::Duration;

use pterosync_core::config::NetworkConfig;
use pterosync_core::domain::SyncError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Retry schedule: `base_delay * 2^attempt`, at most `max_retries` retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(network: &NetworkConfig) -> Self {
        Self::new(
            network.max_retries,
            Duration::from_millis(network.retry_base_delay_ms),
        )
    }

    /// Backoff before retry number `attempt + 1`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Runs `f` until it succeeds, fails permanently or retries run out
    ///
    /// `f` is called once per attempt and must build a fresh request each
    /// time. Returns [`SyncError::Cancelled`] as soon as `cancel` fires.
    pub async fn run<F, Fut, T>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        mut f: F,
    ) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                result = f() => result,
            };

            match result {
                Ok(value) => {
                    if attempt > 0 {
                        info!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.max_retries && err.is_transient() => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient error, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}
