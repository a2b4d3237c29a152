//! Normalized evaluation request handed to the pipeline.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::{ForsetiError, Result};

/// One chatbot interaction to audit.
///
/// The routing/ingestion layer is responsible for turn extraction and
/// timestamp formatting; the pipeline only re-checks the fields it cannot
/// evaluate without.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub conversation_id: i64,
    pub user_query: String,
    pub ai_response: String,
    /// Retrieval context the response is audited against, in rank order.
    #[serde(default)]
    pub context_texts: Vec<String>,
    /// RFC 3339 timestamp of the user turn, if known.
    #[serde(default)]
    pub user_timestamp: Option<String>,
    /// RFC 3339 timestamp of the AI turn, if known.
    #[serde(default)]
    pub ai_timestamp: Option<String>,
}

impl EvaluationRequest {
    /// Reject requests the pipeline cannot evaluate.
    pub fn validate(&self) -> Result<()> {
        if self.ai_response.trim().is_empty() {
            return Err(ForsetiError::Validation(
                "AI response cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Elapsed seconds between the user and AI turns.
    ///
    /// Returns 0.0 when either timestamp is missing or unparsable — chat
    /// latency is advisory metadata, never a reason to fail an evaluation.
    pub fn chat_latency_seconds(&self) -> f64 {
        let (Some(user), Some(ai)) = (&self.user_timestamp, &self.ai_timestamp) else {
            return 0.0;
        };
        match (
            DateTime::parse_from_rfc3339(user),
            DateTime::parse_from_rfc3339(ai),
        ) {
            (Ok(t1), Ok(t2)) => {
                let millis = (t2 - t1).num_milliseconds().abs();
                millis as f64 / 1000.0
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            conversation_id: 1,
            user_query: "Is the room free?".into(),
            ai_response: "Rooms cost $50-80 per night.".into(),
            context_texts: vec![],
            user_timestamp: None,
            ai_timestamp: None,
        }
    }

    #[test]
    fn whitespace_only_response_is_rejected() {
        let mut req = request();
        req.ai_response = "   \n\t ".into();
        assert!(matches!(
            req.validate(),
            Err(ForsetiError::Validation(_))
        ));
    }

    #[test]
    fn latency_from_rfc3339_pair() {
        let mut req = request();
        req.user_timestamp = Some("2024-05-01T10:00:00Z".into());
        req.ai_timestamp = Some("2024-05-01T10:00:02.500Z".into());
        assert!((req.chat_latency_seconds() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn latency_is_absolute() {
        let mut req = request();
        req.user_timestamp = Some("2024-05-01T10:00:05Z".into());
        req.ai_timestamp = Some("2024-05-01T10:00:00Z".into());
        assert!((req.chat_latency_seconds() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn latency_zero_when_missing_or_garbage() {
        assert_eq!(request().chat_latency_seconds(), 0.0);

        let mut req = request();
        req.user_timestamp = Some("yesterday-ish".into());
        req.ai_timestamp = Some("2024-05-01T10:00:00Z".into());
        assert_eq!(req.chat_latency_seconds(), 0.0);
    }
}
