//! Retry configuration, delay calculation, and the judge decorator.
//!
//! Provides [`RetryConfig`] for controlling retry behaviour and
//! [`RetryingJudge`], a decorator that wraps any [`Judge`] with automatic
//! retry on transient errors. Retry policy lives here, not in the
//! escalation logic — the pipeline never sees an intermediate failure,
//! only a reply or an exhausted budget.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{Judge, JudgeReply};
use crate::{ForsetiError, Result, telemetry};

/// Configuration for retry behaviour on transient judge errors.
///
/// Uses exponential backoff between attempts (none before the first):
///
/// ```rust
/// # use forseti::judge::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 2s.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 10s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^attempt`, capped at
    /// `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Calculate the effective delay, respecting provider `retry_after` hints.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute a judge call with retry logic.
///
/// Retries transient errors (as classified by
/// [`ForsetiError::is_transient()`]) up to `config.max_attempts`, sleeping
/// between attempts. Permanent errors — including a malformed verdict
/// body — are returned immediately without retry. When the budget is
/// exhausted the last transient error is wrapped in
/// [`ForsetiError::JudgeUnavailable`].
pub(crate) async fn with_retry<F, Fut>(config: &RetryConfig, model: &str, f: F) -> Result<JudgeReply>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<JudgeReply>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        match f().await {
            Ok(reply) => return Ok(reply),
            Err(e) if e.is_transient() => {
                metrics::counter!(telemetry::RETRIES_TOTAL, "model" => model.to_owned())
                    .increment(1);
                if attempt + 1 < config.max_attempts {
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        model,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying judge call after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(ForsetiError::JudgeUnavailable {
        attempts: config.max_attempts,
        last_error: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".into()),
    })
}

/// Decorator that wraps a [`Judge`] with retry logic.
///
/// Transient transport failures are retried with exponential backoff up to
/// `config.max_attempts`; a malformed verdict is not a transport failure
/// and passes through immediately (whether to escalate is the pipeline's
/// decision, not a retry concern).
pub struct RetryingJudge {
    inner: Arc<dyn Judge>,
    config: RetryConfig,
}

impl RetryingJudge {
    /// Wrap a judge with retry logic.
    pub fn new(inner: Arc<dyn Judge>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Judge for RetryingJudge {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn score(&self, prompt: &str, model: &str) -> Result<JudgeReply> {
        with_retry(&self.config, model, || self.inner.score(prompt, model)).await
    }
}
