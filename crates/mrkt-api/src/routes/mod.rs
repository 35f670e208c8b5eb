//! API routes

mod admin;
mod health;
pub mod metrics;

use axum::{Router, http::StatusCode};
use mrkt_core::Failure;
use mrkt_core::messages::resource_not_found;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

pub use admin::{CurrentAdmin, LOGIN_PATH, USER_PATH, USERS_PATH};

async fn not_found() -> Failure {
    Failure::new(StatusCode::NOT_FOUND, resource_not_found("resource"))
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(admin::routes(&state))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.fallback(not_found)
}
