//! JWT token management
//!
//! Tokens belong to one of two audiences, standard users and admins. Each
//! audience has its own signing secret, so a token minted for one audience
//! never verifies under the other's key.

use chrono::{DateTime, Duration, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Whether the token was minted for the admin audience
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Verified identity carried by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: i64,
    pub is_admin: bool,
}

#[derive(Clone)]
struct AudienceKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AudienceKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies audience-scoped tokens
#[derive(Clone)]
pub struct TokenCodec {
    user: AudienceKeys,
    admin: AudienceKeys,
    token_expiry_hours: i64,
}

impl TokenCodec {
    /// Create a codec from the two audience secrets
    pub fn new(user_secret: &str, admin_secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            user: AudienceKeys::from_secret(user_secret),
            admin: AudienceKeys::from_secret(admin_secret),
            token_expiry_hours,
        }
    }

    fn keys(&self, admin: bool) -> &AudienceKeys {
        if admin { &self.admin } else { &self.user }
    }

    /// Issue a token for a user of the given audience
    pub fn issue(&self, user_id: i64, is_admin: bool) -> Result<String, AuthError> {
        self.issue_at(user_id, is_admin, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: i64,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = TimeDelta::try_hours(self.token_expiry_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(AuthError::ExpiryOutOfRange(self.token_expiry_hours))?;

        let claims = Claims {
            sub: user_id.to_string(),
            admin: is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for user {} (admin: {})", user_id, is_admin);

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.keys(is_admin).encoding,
        )
        .map_err(AuthError::Jwt)
    }

    /// Verify a token against the audience selected by `require_admin`
    ///
    /// Any malformed, foreign, or expired token yields `None`.
    pub fn verify(&self, token: &str, require_admin: bool) -> Option<IdentityClaim> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            match decode::<Claims>(token, &self.keys(require_admin).decoding, &validation) {
                Ok(data) => data,
                Err(e) => {
                    debug!("Token rejected: {}", e);
                    return None;
                }
            };
        let claims = token_data.claims;

        // Expiry is absolute from issuance
        if claims.exp < Utc::now().timestamp() {
            return None;
        }

        if claims.admin != require_admin {
            return None;
        }

        let user_id = claims.sub.parse().ok()?;
        Some(IdentityClaim {
            user_id,
            is_admin: claims.admin,
        })
    }
}
