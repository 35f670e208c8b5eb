//! mrkt admin REST API
//!
//! This crate provides the Axum-based HTTP API for managing user accounts:
//! admin login, the admin gate, and audience-scoped user CRUD.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
