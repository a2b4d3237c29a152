//! Forseti - LLM-as-judge audit pipeline for chatbot interactions
//!
//! This crate scores chatbot responses for relevance and faithfulness
//! against supplied retrieval context, using a hosted judge model while
//! minimizing redundant judge spend: a content-addressed verdict cache, a
//! deterministic guardrail for degenerate responses, and a two-tier
//! escalation policy that re-checks low-confidence verdicts with a
//! stronger judge.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forseti::{
//!     AuditConfig, EvaluationCache, EvaluationPipeline, EvaluationRequest,
//!     judge::{GroqJudge, RetryConfig, RetryingJudge},
//! };
//!
//! #[tokio::main]
//! async fn main() -> forseti::Result<()> {
//!     let judge = RetryingJudge::new(
//!         Arc::new(GroqJudge::new("gsk-your-key")),
//!         RetryConfig::default(),
//!     );
//!     let pipeline = EvaluationPipeline::new(
//!         Arc::new(judge),
//!         Arc::new(EvaluationCache::new()),
//!         AuditConfig::default(),
//!     );
//!
//!     let result = pipeline.evaluate(&EvaluationRequest {
//!         conversation_id: 42,
//!         user_query: "Is the room free?".into(),
//!         ai_response: "Yes, subsidized at $10/night.".into(),
//!         context_texts: vec!["Rooms cost $50-80/night, no subsidy program exists.".into()],
//!         user_timestamp: None,
//!         ai_timestamp: None,
//!     }).await?;
//!
//!     println!(
//!         "relevance {:.2}, faithfulness {:.2}, ${:.6}",
//!         result.relevance_score, result.faithfulness_score, result.estimated_cost_usd,
//!     );
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cost;
pub mod error;
pub mod judge;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStats, EvaluationCache};
pub use cost::PricingTable;
pub use error::{ForsetiError, Result};
pub use pipeline::{AuditConfig, EvaluationPipeline};
pub use types::{
    EvaluationRequest, EvaluationResult, JUDGE_CACHE_HIT, JUDGE_GUARDRAIL, Usage, Verdict,
};
