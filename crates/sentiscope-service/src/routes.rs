//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::state::AppState;
use sentiscope_core::{Error, ANALYZE_FUNCTION, BATCH_FUNCTION};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .fallback(fallback)
        .with_state(state)
}

/// Analysis request body
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

/// Batch analysis request body
#[derive(Debug, Deserialize)]
struct BatchRequest {
    #[serde(default)]
    texts: Vec<String>,
}

/// Single-text analysis endpoint.
///
/// Blank input is rejected here, before anything reaches the invoker, so the
/// model is never loaded for requests that cannot be analyzed.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, AppError> {
    metrics::counter!("sentiscope_requests_total", "endpoint" => "analyze").increment(1);

    if req.text.trim().is_empty() {
        metrics::counter!("sentiscope_decisions_total", "endpoint" => "analyze", "action" => "reject")
            .increment(1);
        debug!("rejecting blank analysis request");
        return Ok(Json(json!({
            "error": "Please provide text to analyze",
            "status": "error",
        })));
    }

    let result = state
        .invoker
        .invoke(ANALYZE_FUNCTION, json!({ "text": req.text }))
        .await?;

    Ok(Json(result))
}

/// Batch analysis endpoint. Returns one entry per input, in input order.
async fn analyze_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Value>, AppError> {
    metrics::counter!("sentiscope_requests_total", "endpoint" => "batch").increment(1);
    info!(count = req.texts.len(), "batch analysis request");

    let result = state
        .invoker
        .invoke(BATCH_FUNCTION, json!({ "texts": req.texts }))
        .await?;

    Ok(Json(result))
}

/// Health check. Static payload; never touches the model.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": state.config.app_name,
        "message": "Ready to analyze sentiment! Send POST requests to /analyze",
    }))
}

/// Prometheus metrics in text exposition format.
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error surface for the HTTP layer.
///
/// Analysis failures never land here (the analyzer converts them into error
/// outcomes); this covers invoker-level failures only.
#[derive(Debug)]
struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            Error::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "function invocation timed out".to_string(),
            ),
            err => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        metrics::counter!("sentiscope_errors_total").increment(1);

        let body = json!({
            "error": message,
            "status": "error",
        });

        (status, Json(body)).into_response()
    }
}
