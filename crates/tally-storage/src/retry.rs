// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with a fixed pause for transient store errors.

use std::future::Future;
use std::time::Duration;

use tally_config::model::RetryConfig;
use tally_core::TallyError;
use tracing::warn;

/// Retry policy applied to every statement the execution wrapper runs.
///
/// An attempt is repeated only when its error is transient (busy/locked),
/// for at most `max_attempts` attempts in total, sleeping `delay` between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy. `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that runs each statement exactly once.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether an error of this kind is worth another attempt.
    pub fn should_retry(&self, err: &TallyError) -> bool {
        err.is_transient()
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number.
    ///
    /// The last error is returned when attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TallyError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TallyError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && self.should_retry(&err) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "transient storage error, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, two seconds apart.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.delay())
    }
}
