//! Admin gate middleware for Axum
//!
//! Every request on a gated router either matches the allow-list or must
//! carry a valid admin-audience token in the `Authorization` header. On
//! success the verified subject is attached to the request as an
//! [`AdminContext`] extension.

use axum::{
    extract::{Request, State},
    http::{Method, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::TokenCodec;

/// Identity of the admin behind the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminContext {
    pub admin_id: i64,
}

/// Gate configuration: the token codec and the unauthenticated routes
#[derive(Clone)]
pub struct AdminGate {
    tokens: Arc<TokenCodec>,
    public_routes: Vec<(Method, String)>,
}

impl AdminGate {
    pub fn new(tokens: Arc<TokenCodec>) -> Self {
        Self {
            tokens,
            public_routes: Vec::new(),
        }
    }

    /// Let `method path` through without a token (exact match)
    pub fn allow(mut self, method: Method, path: impl Into<String>) -> Self {
        self.public_routes.push((method, path.into()));
        self
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        self.public_routes
            .iter()
            .any(|(m, p)| m == method && p == path)
    }
}

/// Pull the token out of an `Authorization` value; a `Bearer ` prefix is optional
fn extract_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

fn deny(reason: &str) -> AuthError {
    debug!("Access denied: {}", reason);
    metrics::counter!("mrkt_access_denied_total").increment(1);
    AuthError::AccessDenied
}

/// Admin gate middleware
pub async fn admin_gate(
    State(gate): State<Arc<AdminGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if gate.is_public(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .ok_or_else(|| deny("missing authorization header"))?;

    let claim = gate
        .tokens
        .verify(token, true)
        .ok_or_else(|| deny("invalid admin token"))?;

    debug!("Authenticated admin: {}", claim.user_id);

    request.extensions_mut().insert(AdminContext {
        admin_id: claim.user_id,
    });

    Ok(next.run(request).await)
}
