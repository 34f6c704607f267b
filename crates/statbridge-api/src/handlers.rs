//! HTTP request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use statbridge_metrics::CONTENT_TYPE;

use crate::local_stats::local_snapshot;
use crate::ApiState;

/// GET /metrics
///
/// Always 200: a failed source scrape renders an empty document.
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = state.registry.gather().await;
    debug!(bytes = body.len(), "metrics scrape served");
    (StatusCode::OK, [("content-type", CONTENT_TYPE)], body)
}

/// GET /api/stats
pub async fn local_stats() -> impl IntoResponse {
    Json(local_snapshot())
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
