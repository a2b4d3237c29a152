//! Public types for the Forseti API.

mod request;
mod result;
mod usage;
mod verdict;

pub use request::EvaluationRequest;
pub use result::EvaluationResult;
pub use usage::Usage;
pub use verdict::{JUDGE_CACHE_HIT, JUDGE_GUARDRAIL, Verdict};
