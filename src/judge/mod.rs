//! Judge invocation: the scoring-oracle seam, its remote implementation,
//! and the retry decorator that wraps it.
//!
//! The pipeline treats the judge as an opaque oracle with a fixed call
//! contract: a rendered audit prompt and a model id go in, a parsed
//! verdict object plus token usage come out. Everything transport-shaped
//! (endpoint, retries, backoff) lives behind the [`Judge`] trait so the
//! escalation policy can be tested against scripted doubles.

pub mod prompt;
pub mod remote;
pub mod retry;

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;
use crate::types::Usage;

pub use remote::GroqJudge;
pub use retry::{RetryConfig, RetryingJudge};

/// Verdict object as returned by a judge model, before policy defaulting.
///
/// Individual fields may be absent — the pipeline defaults missing scores
/// to 0 (fail-closed). A body that does not deserialize into this shape
/// at all is a [`MalformedVerdict`](crate::ForsetiError::MalformedVerdict)
/// error, not a default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVerdict {
    pub relevance_score: Option<f64>,
    pub faithfulness_score: Option<f64>,
    pub reasoning: Option<String>,
}

/// One successful judge call: the parsed verdict and its token usage.
#[derive(Debug, Clone)]
pub struct JudgeReply {
    pub verdict: RawVerdict,
    pub usage: Usage,
}

/// The external scoring oracle.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Short identifier for logs and metrics.
    fn name(&self) -> &str;

    /// Send the audit prompt to the named model and parse its verdict.
    async fn score(&self, prompt: &str, model: &str) -> Result<JudgeReply>;
}
