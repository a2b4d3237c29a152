//! Retry decorator behaviour against a judge double.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use forseti::judge::{Judge, JudgeReply, RawVerdict, RetryConfig, RetryingJudge};
use forseti::{ForsetiError, Result, Usage};

/// Mock judge that fails N times then succeeds.
struct FailThenSucceed {
    fail_count: AtomicU32,
    fail_with: fn() -> ForsetiError,
    total_calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(failures: u32, fail_with: fn() -> ForsetiError) -> Self {
        Self {
            fail_count: AtomicU32::new(failures),
            fail_with,
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Judge for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn score(&self, _prompt: &str, _model: &str) -> Result<JudgeReply> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err((self.fail_with)());
        }
        Ok(JudgeReply {
            verdict: RawVerdict {
                relevance_score: Some(1.0),
                faithfulness_score: Some(1.0),
                reasoning: Some("ok".into()),
            },
            usage: Usage::new(10, 5),
        })
    }
}

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig::new()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(4))
}

#[tokio::test]
async fn two_failures_then_success_uses_three_attempts() {
    let inner = Arc::new(FailThenSucceed::new(2, || {
        ForsetiError::Http("timeout".into())
    }));
    let judge = RetryingJudge::new(inner.clone(), fast_config(3));

    let result = judge.score("prompt", "tier1-model").await;

    assert!(result.is_ok());
    assert_eq!(inner.call_count(), 3); // 2 failures + 1 success
}

#[tokio::test]
async fn exhausted_budget_surfaces_judge_unavailable_without_a_fourth_attempt() {
    let inner = Arc::new(FailThenSucceed::new(10, || ForsetiError::Api {
        status: 503,
        message: "unavailable".into(),
    }));
    let judge = RetryingJudge::new(inner.clone(), fast_config(3));

    let err = judge.score("prompt", "tier1-model").await.unwrap_err();

    assert_eq!(inner.call_count(), 3);
    match err {
        ForsetiError::JudgeUnavailable {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("503"));
        }
        other => panic!("expected JudgeUnavailable, got {other}"),
    }
}

#[tokio::test]
async fn malformed_verdict_is_not_retried() {
    let inner = Arc::new(FailThenSucceed::new(1, || {
        ForsetiError::MalformedVerdict("not a JSON object".into())
    }));
    let judge = RetryingJudge::new(inner.clone(), fast_config(5));

    let err = judge.score("prompt", "tier1-model").await.unwrap_err();

    assert!(matches!(err, ForsetiError::MalformedVerdict(_)));
    assert_eq!(inner.call_count(), 1); // no retry
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let inner = Arc::new(FailThenSucceed::new(1, || {
        ForsetiError::AuthenticationFailed
    }));
    let judge = RetryingJudge::new(inner.clone(), fast_config(5));

    let result = judge.score("prompt", "tier1-model").await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn respects_retry_after_hint() {
    let inner = Arc::new(FailThenSucceed::new(1, || ForsetiError::RateLimited {
        retry_after: Some(Duration::from_millis(50)),
    }));
    let judge = RetryingJudge::new(inner.clone(), fast_config(2));

    let start = std::time::Instant::now();
    let result = judge.score("prompt", "tier1-model").await;
    let elapsed = start.elapsed();

    assert!(result.is_ok());
    // Should have waited at least the hinted 50ms, not the 1ms backoff.
    assert!(elapsed >= Duration::from_millis(40)); // some tolerance
}

#[tokio::test]
async fn disabled_config_makes_a_single_attempt() {
    let inner = Arc::new(FailThenSucceed::new(1, || {
        ForsetiError::Http("reset".into())
    }));
    let judge = RetryingJudge::new(inner.clone(), RetryConfig::disabled());

    let err = judge.score("prompt", "tier1-model").await.unwrap_err();

    assert!(matches!(err, ForsetiError::JudgeUnavailable { .. }));
    assert_eq!(inner.call_count(), 1);
}
