//! Prometheus metrics endpoint
//!
//! Renders the `mrkt_*` counters recorded across the service:
//! `mrkt_logins_total{outcome}`, `mrkt_access_denied_total`,
//! `mrkt_users_created_total` and `mrkt_health_checks_total`.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use std::sync::Arc;

use crate::state::MetricsHandle;

/// Create metrics routes with the Prometheus handle
pub fn routes(handle: Arc<MetricsHandle>) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .with_state(handle)
}

/// GET /metrics - Prometheus metrics endpoint
async fn get_metrics(State(handle): State<Arc<MetricsHandle>>) -> impl IntoResponse {
    handle.render()
}
