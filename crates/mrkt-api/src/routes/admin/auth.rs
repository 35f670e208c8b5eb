//! Admin login and the authenticated-admin extractor

use axum::{
    Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::post,
};
use bytes::Bytes;
use mrkt_auth::{AdminContext, verify_password_or_dummy};
use mrkt_core::Success;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::LOGIN_PATH;
use super::types::{LoginRequest, LoginResponse};

// ==================== Auth Extractors ====================

/// Extractor for the admin attached by the gate
///
/// Rejects with access-denied when the request did not pass through the gate.
pub struct CurrentAdmin(pub AdminContext);

impl<S> FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .copied()
            .map(CurrentAdmin)
            .ok_or(ApiError::AccessDenied)
    }
}

// ==================== Auth Routes ====================

/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Success<LoginResponse>, ApiError> {
    let request: LoginRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    debug!("Login attempt for admin: {}", request.email);

    let user = state.db.get_user_by_email(&request.email, true).await?;

    // Unknown email and wrong password must be indistinguishable
    let password_valid = verify_password_or_dummy(
        &request.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            metrics::counter!("mrkt_logins_total", "outcome" => "rejected").increment(1);
            return Err(ApiError::IncorrectCredentials);
        }
    };

    let token = state.tokens.issue(user.id, true)?;

    metrics::counter!("mrkt_logins_total", "outcome" => "accepted").increment(1);
    info!("Admin {} logged in", user.id);

    Ok(Success(LoginResponse { token }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route(LOGIN_PATH, post(login))
}
