//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mrkt_core::Failure;
use mrkt_core::messages::ACCESS_DENIED;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token expiry out of range: {0} hours")]
    ExpiryOutOfRange(i64),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::AccessDenied => Failure::new(StatusCode::FORBIDDEN, ACCESS_DENIED),
            AuthError::PasswordHash(_) | AuthError::ExpiryOutOfRange(_) | AuthError::Jwt(_) => {
                Failure::new(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
        .into_response()
    }
}
