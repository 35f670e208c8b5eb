//! mrkt Database Layer
//!
//! This crate provides the user record store for the mrkt admin API,
//! using SQLite via sqlx for persistence.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
