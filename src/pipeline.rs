//! The evaluation decision pipeline.
//!
//! Five strictly ordered stages, each terminal unless it falls through:
//!
//! 1. **Cache check** — a stored verdict for the same (query, response)
//!    pair is replayed at zero cost.
//! 2. **Guardrail** — a trimmed response under [`MIN_RESPONSE_CHARS`] is
//!    zero-scored deterministically; no judge call is made.
//! 3. **Tier-1 pass** — the cheap judge scores the interaction.
//! 4. **Escalation decision** — if either tier-1 score falls below the
//!    confidence threshold, the strong judge re-scores the same prompt
//!    and its verdict becomes authoritative; token usage is summed.
//! 5. **Finalize** — cost accounting, cache write, result construction.
//!
//! The stages are sequential by necessity (tier-3 depends on tier-1's
//! result); concurrency exists only across independent evaluations, which
//! share the cache through `Arc`.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::{CacheStats, EvaluationCache};
use crate::cost::PricingTable;
use crate::judge::prompt::build_audit_prompt;
use crate::judge::{Judge, RawVerdict};
use crate::telemetry;
use crate::Result;
use crate::types::{EvaluationRequest, EvaluationResult, Usage, Verdict};

/// Minimum trimmed response length worth paying a judge to evaluate.
pub const MIN_RESPONSE_CHARS: usize = 5;

/// Tier-1 scores at or above this threshold are trusted without escalation.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// Default tier-1 (fast, cheap) judge model.
pub const DEFAULT_TIER1_MODEL: &str = "llama-3.1-8b-instant";

/// Default tier-3 (strong, slow) judge model.
pub const DEFAULT_TIER3_MODEL: &str = "llama-3.3-70b-versatile";

/// Verdict reasoning recorded on a guardrail rejection.
const GUARDRAIL_REASONING: &str =
    "Response rejected by deterministic check: too short to carry an evaluable claim.";

/// Reasoning recorded when a judge omits the reasoning field.
const MISSING_REASONING: &str = "Analysis unavailable.";

/// Judge tiers, escalation threshold, and pricing for one pipeline.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Model id for the tier-1 (cheap) pass.
    pub tier1_model: String,
    /// Model id for the tier-3 (strong) pass.
    pub tier3_model: String,
    /// Escalate when either tier-1 score is strictly below this.
    pub confidence_threshold: f64,
    /// Rate table for cost estimates.
    pub pricing: PricingTable,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tier1_model: DEFAULT_TIER1_MODEL.to_string(),
            tier3_model: DEFAULT_TIER3_MODEL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            pricing: PricingTable::default(),
        }
    }
}

impl AuditConfig {
    /// Create a config with the default tiers and threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tier-1 model id.
    pub fn tier1_model(mut self, model: impl Into<String>) -> Self {
        self.tier1_model = model.into();
        self
    }

    /// Set the tier-3 model id.
    pub fn tier3_model(mut self, model: impl Into<String>) -> Self {
        self.tier3_model = model.into();
        self
    }

    /// Set the escalation threshold.
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the pricing table.
    pub fn pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }
}

/// Orchestrates guardrail, cache, tiered escalation, and cost accounting.
pub struct EvaluationPipeline {
    judge: Arc<dyn Judge>,
    cache: Arc<EvaluationCache>,
    config: AuditConfig,
}

impl EvaluationPipeline {
    /// Build a pipeline over a judge and a shared verdict cache.
    pub fn new(judge: Arc<dyn Judge>, cache: Arc<EvaluationCache>, config: AuditConfig) -> Self {
        Self {
            judge,
            cache,
            config,
        }
    }

    /// Evaluate one interaction.
    ///
    /// Judge failures (either tier) abort the evaluation: a silently
    /// defaulted score would be indistinguishable from a real judgment.
    /// Nothing is cached on failure.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        let started = Instant::now();
        request.validate()?;

        // Stage 1: cache check
        if let Some(verdict) = self
            .cache
            .lookup(&request.user_query, &request.ai_response)
        {
            debug!(conversation_id = request.conversation_id, "verdict cache hit");
            return Ok(self.finish(request, verdict, 0.0, started, "cache-hit"));
        }

        // Stage 2: deterministic guardrail
        if request.ai_response.trim().chars().count() < MIN_RESPONSE_CHARS {
            metrics::counter!(telemetry::GUARDRAIL_REJECTIONS_TOTAL).increment(1);
            let verdict = Verdict::guardrail(GUARDRAIL_REASONING);
            return Ok(self.finish(request, verdict, 0.0, started, "guardrail"));
        }

        // Stage 3: tier-1 judge pass
        let prompt = build_audit_prompt(request);
        let tier1 = self.judge.score(&prompt, &self.config.tier1_model).await?;
        let mut usage = tier1.usage;

        // Stage 4: escalation decision
        let (raw, deciding_model, outcome) =
            if below_confidence(&tier1.verdict, self.config.confidence_threshold) {
                metrics::counter!(telemetry::ESCALATIONS_TOTAL).increment(1);
                info!(
                    conversation_id = request.conversation_id,
                    relevance = tier1.verdict.relevance_score.unwrap_or(0.0),
                    faithfulness = tier1.verdict.faithfulness_score.unwrap_or(0.0),
                    tier3_model = %self.config.tier3_model,
                    "low-confidence tier-1 verdict, escalating"
                );
                let tier3 = self.judge.score(&prompt, &self.config.tier3_model).await?;
                usage.accumulate(&tier3.usage);
                (tier3.verdict, self.config.tier3_model.as_str(), "tier3")
            } else {
                (tier1.verdict, self.config.tier1_model.as_str(), "tier1")
            };

        // Stage 5: finalize
        record_token_usage(&usage);
        let verdict = finalize_verdict(raw, deciding_model);
        let cost = self.config.pricing.estimate(&usage);
        self.cache
            .store(&request.user_query, &request.ai_response, &verdict);

        Ok(self.finish(request, verdict, cost, started, outcome))
    }

    /// Occupancy of the shared verdict cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn finish(
        &self,
        request: &EvaluationRequest,
        verdict: Verdict,
        cost: f64,
        started: Instant,
        outcome: &'static str,
    ) -> EvaluationResult {
        let eval_duration = started.elapsed().as_secs_f64();
        metrics::counter!(telemetry::EVALUATIONS_TOTAL, "outcome" => outcome).increment(1);
        metrics::histogram!(telemetry::EVAL_DURATION_SECONDS, "outcome" => outcome)
            .record(eval_duration);

        EvaluationResult {
            conversation_id: request.conversation_id,
            relevance_score: verdict.relevance,
            faithfulness_score: verdict.faithfulness,
            reasoning: verdict.reasoning,
            judge: verdict.judge,
            chat_latency_seconds: request.chat_latency_seconds(),
            eval_duration_seconds: eval_duration,
            estimated_cost_usd: cost,
            created_at: Utc::now(),
        }
    }
}

/// Whether either score falls strictly below the confidence threshold.
///
/// Missing scores count as 0 (fail-closed), so a judge that omits a field
/// always triggers escalation rather than silent acceptance.
fn below_confidence(raw: &RawVerdict, threshold: f64) -> bool {
    raw.relevance_score.unwrap_or(0.0) < threshold
        || raw.faithfulness_score.unwrap_or(0.0) < threshold
}

/// Apply fail-closed defaults, clamp scores into range, and tag the
/// reasoning with the deciding model.
fn finalize_verdict(raw: RawVerdict, deciding_model: &str) -> Verdict {
    let reasoning = raw.reasoning.unwrap_or_else(|| MISSING_REASONING.into());
    Verdict {
        relevance: raw.relevance_score.unwrap_or(0.0).clamp(0.0, 1.0),
        faithfulness: raw.faithfulness_score.unwrap_or(0.0).clamp(0.0, 1.0),
        reasoning: format!("{reasoning} [judge: {deciding_model}]"),
        judge: deciding_model.to_string(),
    }
}

fn record_token_usage(usage: &Usage) {
    metrics::counter!(telemetry::JUDGE_TOKENS_TOTAL, "direction" => "prompt")
        .increment(u64::from(usage.prompt_tokens));
    metrics::counter!(telemetry::JUDGE_TOKENS_TOTAL, "direction" => "completion")
        .increment(u64::from(usage.completion_tokens));
}
