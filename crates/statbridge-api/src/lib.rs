//! statbridge-api — HTTP surface of the exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition, one source scrape per request |
//! | GET | `/api/stats` | This process's own stats snapshot as JSON |
//! | GET | `/healthz` | Liveness |

pub mod handlers;
pub mod local_stats;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use statbridge_metrics::Registry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<Registry>,
}

/// Build the complete router.
pub fn build_router(registry: Arc<Registry>) -> Router {
    let api_state = ApiState { registry };

    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/api/stats", get(handlers::local_stats))
        .route("/healthz", get(handlers::healthz))
        .with_state(api_state)
}
