//! Uniform response envelope
//!
//! Every response body is either
//! `{"status":"success","data":...}` or
//! `{"status":"error","message":"...","data":{...}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

/// Wire shape of a response body
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error { message: String, data: Value },
}

/// A successful outcome, answered with 200
#[derive(Debug)]
pub struct Success<T>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(Envelope::Success { data: self.0 })).into_response()
    }
}

/// A failed outcome with its status code
///
/// Server faults are the only failures written to the error log.
#[derive(Debug)]
pub struct Failure {
    pub status: StatusCode,
    pub message: String,
    pub data: Value,
}

impl Failure {
    /// Failure with an empty `data` object
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: Value::Object(Map::new()),
        }
    }

    /// Failure carrying a payload, such as a validation error map
    pub fn with_data(status: StatusCode, message: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            status,
            message: message.into(),
            data: serde_json::to_value(data).unwrap_or_else(|_| Value::Object(Map::new())),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{}", self.message);
        }

        let body: Envelope<()> = Envelope::Error {
            message: self.message,
            data: self.data,
        };

        (self.status, Json(body)).into_response()
    }
}
