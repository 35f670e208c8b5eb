//! Application state

use mrkt_auth::TokenCodec;
use mrkt_db::Database;
use std::sync::Arc;

/// Prometheus render handle for the `/metrics` endpoint
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
///
/// Both members are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenCodec>) -> Self {
        Self { db, tokens }
    }
}
