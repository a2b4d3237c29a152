//! Structured evaluation result returned to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one pipeline invocation.
///
/// Constructed once per evaluation, immutable, and not retained by the
/// pipeline — persistence is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub conversation_id: i64,
    /// Does the response answer the question asked? `[0, 1]`.
    pub relevance_score: f64,
    /// Is every claim supported by the retrieval context? `[0, 1]`.
    pub faithfulness_score: f64,
    pub reasoning: String,
    /// Model id that produced the verdict, or a short-circuit sentinel.
    pub judge: String,
    /// Seconds between the user and AI turns (0.0 if unknown).
    pub chat_latency_seconds: f64,
    /// Wall-clock seconds spent inside the pipeline.
    pub eval_duration_seconds: f64,
    /// Estimated judge spend in USD (0.0 for cache hits and guardrail
    /// short-circuits).
    pub estimated_cost_usd: f64,
    pub created_at: DateTime<Utc>,
}
