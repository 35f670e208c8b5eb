//! Admin API routes
//!
//! Login, the admin gate, and user lifecycle management.

pub mod auth;
pub mod types;
pub mod users;

use axum::{Router, http::Method, middleware::from_fn_with_state};
use mrkt_auth::{AdminGate, admin_gate};
use std::sync::Arc;

use crate::state::AppState;

pub use auth::CurrentAdmin;

pub const LOGIN_PATH: &str = "/admin/login";
pub const USERS_PATH: &str = "/admin/users";
pub const USER_PATH: &str = "/admin/users/{id}";

/// Create admin API routes behind the admin gate
///
/// Login and user creation are reachable without a token.
pub fn routes(state: &AppState) -> Router<AppState> {
    let gate = AdminGate::new(state.tokens.clone())
        .allow(Method::POST, LOGIN_PATH)
        .allow(Method::POST, USERS_PATH);

    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .route_layer(from_fn_with_state(Arc::new(gate), admin_gate))
}
