//! HTTP surface for the evaluation pipeline.
//!
//! A thin REST layer: it accepts already-normalized evaluation requests,
//! hands them to the pipeline, and serializes results. All decision logic
//! lives in [`EvaluationPipeline`]; this module only does routing,
//! status-code mapping, and middleware.

pub mod config;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::EvaluationPipeline;
use crate::types::{EvaluationRequest, EvaluationResult};
use crate::{CacheStats, ForsetiError};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<EvaluationPipeline>,
    environment: String,
}

impl AppState {
    /// Create handler state over a pipeline.
    pub fn new(pipeline: Arc<EvaluationPipeline>, environment: impl Into<String>) -> Self {
        Self {
            pipeline,
            environment: environment.into(),
        }
    }
}

/// Build the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/evaluate", post(evaluate_handler))
        .route("/api/v1/cache/stats", get(cache_stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct RootResponse {
    service: &'static str,
    version: &'static str,
    status: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        service: "forseti",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    environment: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "active",
        environment: state.environment.clone(),
    })
}

async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResult>, ApiError> {
    let result = state.pipeline.evaluate(&request).await?;
    Ok(Json(result))
}

async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.pipeline.cache_stats())
}

/// Maps pipeline failures onto HTTP status codes.
struct ApiError(ForsetiError);

impl From<ForsetiError> for ApiError {
    fn from(err: ForsetiError) -> Self {
        Self(err)
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ForsetiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForsetiError::JudgeUnavailable { .. }
            | ForsetiError::MalformedVerdict(_)
            | ForsetiError::EmptyReply
            | ForsetiError::RateLimited { .. }
            | ForsetiError::Http(_)
            | ForsetiError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self.0, "evaluation request failed");
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
