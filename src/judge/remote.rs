//! Groq chat-completions client for judge calls.
//!
//! Speaks the OpenAI-compatible `chat/completions` protocol. Decoding is
//! pinned to the deterministic extreme (`temperature: 0`) and the reply
//! body is constrained to a JSON object, so the same (prompt, model) pair
//! yields a stable verdict.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Judge, JudgeReply, RawVerdict, prompt::SYSTEM_INSTRUCTION};
use crate::types::Usage;
use crate::{ForsetiError, Result};

/// Default base URL for the Groq OpenAI-compatible API.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Request timeout for a single judge call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Judge client backed by Groq's chat-completions endpoint.
#[derive(Clone)]
pub struct GroqJudge {
    api_key: String,
    http: Client,
    base_url: String,
}

impl GroqJudge {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }

    fn classify_status(status: StatusCode, body: String) -> ForsetiError {
        match status.as_u16() {
            401 | 403 => ForsetiError::AuthenticationFailed,
            429 => ForsetiError::RateLimited { retry_after: None },
            code => ForsetiError::Api {
                status: code,
                message: body,
            },
        }
    }
}

#[async_trait::async_trait]
impl Judge for GroqJudge {
    fn name(&self) -> &str {
        "groq"
    }

    async fn score(&self, prompt: &str, model: &str) -> Result<JudgeReply> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatRequest {
                model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: SYSTEM_INSTRUCTION,
                    },
                    ChatMessage {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: 0.0,
                response_format: ResponseFormat {
                    format_type: "json_object",
                },
            })
            .send()
            .await
            .map_err(|e| ForsetiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ForsetiError::Http(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ForsetiError::EmptyReply)?;

        let verdict: RawVerdict = serde_json::from_str(&content).map_err(|e| {
            ForsetiError::MalformedVerdict(format!("{e} (body: {})", truncate(&content, 200)))
        })?;

        Ok(JudgeReply {
            verdict,
            usage: Usage::new(
                completion.usage.prompt_tokens,
                completion.usage.completion_tokens,
            ),
        })
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: ApiUsage,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
