//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mrkt_core::messages::{
    ACCESS_DENIED, INCORRECT_CREDENTIALS, INVALID_PARAMS, resource_exists, resource_not_found,
};
use mrkt_core::{Failure, ValidationErrorMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Incorrect credentials")]
    IncorrectCredentials,

    #[error("Invalid input")]
    InvalidInput(ValidationErrorMap),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource name, e.g. `user`
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource name, e.g. `user`
    #[error("Already exists: {0}")]
    Exists(String),

    #[error("{0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] mrkt_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] mrkt_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let failure = match self {
            ApiError::AccessDenied => Failure::new(StatusCode::FORBIDDEN, ACCESS_DENIED),
            ApiError::IncorrectCredentials => {
                Failure::new(StatusCode::UNAUTHORIZED, INCORRECT_CREDENTIALS)
            }
            ApiError::InvalidInput(errors) => {
                Failure::with_data(StatusCode::BAD_REQUEST, INVALID_PARAMS, errors)
            }
            ApiError::BadRequest(msg) => Failure::new(StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(resource) => {
                Failure::new(StatusCode::NOT_FOUND, resource_not_found(&resource))
            }
            ApiError::Exists(resource) => {
                Failure::new(StatusCode::CONFLICT, resource_exists(&resource))
            }
            ApiError::Internal(msg) => Failure::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Database(e) => match e {
                mrkt_db::DbError::NotFound(_) => {
                    Failure::new(StatusCode::NOT_FOUND, resource_not_found("record"))
                }
                mrkt_db::DbError::Duplicate(_) => {
                    Failure::new(StatusCode::CONFLICT, resource_exists("record"))
                }
                _ => Failure::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::Auth(e) => return e.into_response(),
        };

        failure.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = render(ApiError::IncorrectCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], INCORRECT_CREDENTIALS);

        let (status, body) = render(ApiError::NotFound("user".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "This user was not found.");

        let (status, body) = render(ApiError::Exists("user".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "This user already exists.");

        let (status, body) = render(ApiError::Auth(mrkt_auth::AuthError::AccessDenied)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], ACCESS_DENIED);
    }

    #[tokio::test]
    async fn test_invalid_input_carries_error_map() {
        let mut errors = ValidationErrorMap::new();
        errors.insert("email".to_string(), "Email must be a valid email".to_string());

        let (status, body) = render(ApiError::InvalidInput(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], INVALID_PARAMS);
        assert_eq!(body["data"]["email"], "Email must be a valid email");
    }

    #[tokio::test]
    async fn test_server_fault_keeps_underlying_message() {
        let (status, body) = render(ApiError::Internal("EOF while parsing".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "EOF while parsing");
        assert_eq!(body["data"], serde_json::json!({}));
    }
}
