//! mrkt Authentication and Authorization
//!
//! This crate provides the two-audience JWT codec, argon2 password hashing,
//! and the admin gate middleware for the mrkt admin API.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, IdentityClaim, TokenCodec};
pub use middleware::{AdminContext, AdminGate, admin_gate};
pub use password::{hash_password, verify_password, verify_password_or_dummy};
