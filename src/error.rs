//! Forseti error types

use std::time::Duration;

/// Forseti error types
#[derive(Debug, thiserror::Error)]
pub enum ForsetiError {
    // Judge transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("empty reply from judge model")]
    EmptyReply,

    /// The judge replied, but not with a JSON object of the expected shape.
    ///
    /// This is a hard failure for the call: the transport layer never
    /// substitutes default scores for an unparsable body.
    #[error("malformed judge verdict: {0}")]
    MalformedVerdict(String),

    /// The retry budget is exhausted; no partial verdict is produced.
    #[error("judge unavailable after {attempts} attempts: {last_error}")]
    JudgeUnavailable { attempts: u32, last_error: String },

    // Input errors
    #[error("invalid request: {0}")]
    Validation(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ForsetiError {
    /// Whether a retry of the same call could plausibly succeed.
    ///
    /// Transport failures and server-side errors are transient; malformed
    /// verdicts, validation failures, and auth errors are not — retrying
    /// them would repeat the same outcome.
    pub fn is_transient(&self) -> bool {
        match self {
            ForsetiError::Http(_) => true,
            ForsetiError::RateLimited { .. } => true,
            ForsetiError::EmptyReply => true,
            ForsetiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Provider-supplied delay hint, if any (from a `RateLimited` error).
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ForsetiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Forseti operations
pub type Result<T> = std::result::Result<T, ForsetiError>;
