//! mrkt shared building blocks
//!
//! User-facing messages, the response envelope every endpoint answers with,
//! and the request validator that turns rule failures into an error map.

pub mod envelope;
pub mod messages;
pub mod validation;

pub use envelope::{Envelope, Failure, Success};
pub use validation::{ValidationErrorMap, validate_request};
