//! Health check endpoints

use axum::{Router, routing::get};
use mrkt_core::Success;
use serde::Serialize;

use crate::state::AppState;

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler
async fn health() -> Success<HealthResponse> {
    metrics::counter!("mrkt_health_checks_total").increment(1);

    Success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}
