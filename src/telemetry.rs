//! Telemetry metric name constants.
//!
//! Centralised metric names for forseti operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `forseti_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `outcome` — how an evaluation terminated: "cache-hit", "guardrail",
//!   "tier1", "tier3", "error"
//! - `model` — judge model id
//! - `direction` — token direction: "prompt" or "completion"

/// Total evaluations run through the pipeline.
///
/// Labels: `outcome`.
pub const EVALUATIONS_TOTAL: &str = "forseti_evaluations_total";

/// Wall-clock evaluation duration in seconds.
///
/// Labels: `outcome`.
pub const EVAL_DURATION_SECONDS: &str = "forseti_eval_duration_seconds";

/// Total verdict cache hits.
pub const CACHE_HITS_TOTAL: &str = "forseti_cache_hits_total";

/// Total verdict cache misses.
pub const CACHE_MISSES_TOTAL: &str = "forseti_cache_misses_total";

/// Total cache evictions, split by cause.
///
/// Labels: `reason` ("capacity" | "expired").
pub const CACHE_EVICTIONS_TOTAL: &str = "forseti_cache_evictions_total";

/// Total judge retry attempts (not counting the initial request).
///
/// Labels: `model`.
pub const RETRIES_TOTAL: &str = "forseti_retries_total";

/// Total escalations from the tier-1 to the tier-3 judge.
pub const ESCALATIONS_TOTAL: &str = "forseti_escalations_total";

/// Total responses rejected by the deterministic guardrail.
pub const GUARDRAIL_REJECTIONS_TOTAL: &str = "forseti_guardrail_rejections_total";

/// Total judge tokens consumed.
///
/// Labels: `direction` ("prompt" | "completion").
pub const JUDGE_TOKENS_TOTAL: &str = "forseti_judge_tokens_total";
