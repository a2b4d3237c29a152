//! Wiremock integration tests for the Groq judge client.
//!
//! These tests verify correct HTTP interaction and error handling using
//! mocked chat-completions responses.

use forseti::ForsetiError;
use forseti::judge::{GroqJudge, Judge};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 812, "completion_tokens": 64, "total_tokens": 876}
    })
}

#[tokio::test]
async fn parses_verdict_and_usage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"relevance_score": 0.9, "faithfulness_score": 0.2, "reasoning": "price not in context"}"#,
        )))
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    let reply = judge
        .score("audit prompt", "llama-3.1-8b-instant")
        .await
        .expect("score should succeed");

    assert_eq!(reply.verdict.relevance_score, Some(0.9));
    assert_eq!(reply.verdict.faithfulness_score, Some(0.2));
    assert_eq!(
        reply.verdict.reasoning.as_deref(),
        Some("price not in context")
    );
    assert_eq!(reply.usage.prompt_tokens, 812);
    assert_eq!(reply.usage.completion_tokens, 64);
    assert_eq!(reply.usage.total_tokens, 876);
}

#[tokio::test]
async fn sends_deterministic_json_constrained_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "temperature": 0.0,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"relevance_score": 1.0, "faithfulness_score": 1.0, "reasoning": "ok"}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    judge
        .score("audit prompt", "llama-3.3-70b-versatile")
        .await
        .expect("score should succeed");
}

#[tokio::test]
async fn non_json_content_is_a_malformed_verdict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("The response looks faithful to me.")),
        )
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    let err = judge.score("audit prompt", "m").await.unwrap_err();

    assert!(matches!(err, ForsetiError::MalformedVerdict(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn missing_choices_is_an_empty_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [],
            "usage": {"prompt_tokens": 1, "completion_tokens": 0}
        })))
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    let err = judge.score("audit prompt", "m").await.unwrap_err();

    assert!(matches!(err, ForsetiError::EmptyReply));
}

#[tokio::test]
async fn server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    let err = judge.score("audit prompt", "m").await.unwrap_err();

    assert!(matches!(err, ForsetiError::Api { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn unauthorized_is_a_permanent_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("bad_key", mock_server.uri());
    let err = judge.score("audit prompt", "m").await.unwrap_err();

    assert!(matches!(err, ForsetiError::AuthenticationFailed));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn rate_limit_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let judge = GroqJudge::with_base_url("test_key", mock_server.uri());
    let err = judge.score("audit prompt", "m").await.unwrap_err();

    assert!(matches!(err, ForsetiError::RateLimited { .. }));
    assert!(err.is_transient());
}
