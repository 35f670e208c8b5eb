//! Request/Response DTOs for the admin API
//!
//! Field names follow the PascalCase wire format (`Email`, `Password`, ...).

use std::str::FromStr;

use mrkt_core::validation::{required_email, required_min_length};
use mrkt_db::{Location, NewUser, STATUS_ENABLED, User, UserRank};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ==================== Query Types ====================

/// `?isAdmin=` audience selector; only the literal `true` selects admins
#[derive(Debug, Default, Deserialize)]
pub struct AudienceQuery {
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<String>,
}

impl AudienceQuery {
    pub fn admin_scope(&self) -> bool {
        self.is_admin.as_deref() == Some("true")
    }
}

// ==================== Auth Types ====================

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ==================== User Types ====================

const PASSWORD_MIN_LENGTH: u64 = 6;

fn validate_password(password: &str) -> Result<(), ValidationError> {
    required_min_length(password, PASSWORD_MIN_LENGTH)
}

fn validate_location(location: &str) -> Result<(), ValidationError> {
    if Location::from_str(location).is_ok() {
        return Ok(());
    }

    let allowed = Location::ALL
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let mut err = ValidationError::new("oneof");
    err.add_param("allowed".into(), &allowed);
    Err(err)
}

/// Create user request
///
/// Decoded onto defaults, so omitted fields are well defined. There is no
/// admin flag here: it comes from the query string only.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateUserRequest {
    #[validate(custom(function = "required_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(range(min = 1, max = 3, code = "range"))]
    pub rank: i64,
    #[validate(custom(function = "validate_location"))]
    pub location: String,
    pub status: String,
}

impl Default for CreateUserRequest {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            rank: UserRank::default().into(),
            location: Location::default().as_str().to_string(),
            status: STATUS_ENABLED.to_string(),
        }
    }
}

impl CreateUserRequest {
    /// Build the record to insert; call only after validation
    pub fn into_new_user(self, password_hash: String, is_admin: bool) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            rank: UserRank::try_from(self.rank).unwrap_or_default(),
            location: Location::from_str(&self.location).unwrap_or_default(),
            status: self.status,
            is_admin,
        }
    }
}

/// Update user request: every field optional, absent fields keep their value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub rank: Option<UserRank>,
    pub location: Option<Location>,
    pub status: Option<String>,
}

impl UpdateUserRequest {
    /// Merge onto an existing record; `password_hash` replaces the stored hash when set
    pub fn apply(self, user: &mut User, password_hash: Option<String>) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(rank) = self.rank {
            user.rank = rank;
        }
        if let Some(location) = self.location {
            user.location = location;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

/// Delete result
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteUserResponse {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mrkt_core::validate_request;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"Email":"a@b.com","Password":"secret123"}"#).unwrap();

        assert_eq!(request.rank, 1);
        assert_eq!(request.location, "unknown");
        assert_eq!(request.status, "enabled");
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_create_request_ignores_body_admin_flag() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"Email":"a@b.com","Password":"secret123","IsAdmin":true}"#,
        )
        .unwrap();

        let user = request.into_new_user("hash".to_string(), false);
        assert!(!user.is_admin);
    }

    #[test]
    fn test_create_request_rules() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"Email":"not-an-email","Password":"abc","Rank":5,"Location":"moon"}"#,
        )
        .unwrap();

        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors["email"], "Email must be a valid email");
        assert_eq!(
            errors["min"],
            "Password must be at least 6 characters in length"
        );
        assert!(!errors.contains_key("required"));
        assert_eq!(errors["range"], "Rank must be between 1 and 3");
        assert_eq!(
            errors["oneof"],
            "Location must be one of [safe warning unsafe unknown]"
        );
    }

    #[test]
    fn test_missing_credentials_only_report_required() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();

        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors["required"],
            "Email is a required field, Password is a required field"
        );
    }

    #[test]
    fn test_audience_query() {
        let admin = AudienceQuery {
            is_admin: Some("true".to_string()),
        };
        let other = AudienceQuery {
            is_admin: Some("TRUE".to_string()),
        };

        assert!(admin.admin_scope());
        assert!(!other.admin_scope());
        assert!(!AudienceQuery::default().admin_scope());
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let now = Utc::now();
        let mut user = User {
            id: 1,
            email: "old@b.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            rank: UserRank::Beta,
            location: Location::Safe,
            status: "enabled".to_string(),
            is_admin: true,
            created_at: now,
            updated_at: now,
        };
        let before = user.clone();

        let patch: UpdateUserRequest = serde_json::from_str(r#"{"Email":"new@b.com"}"#).unwrap();
        patch.apply(&mut user, None);

        assert_eq!(user.email, "new@b.com");
        assert_eq!(
            User {
                email: before.email.clone(),
                ..user.clone()
            },
            before
        );
    }

    #[test]
    fn test_update_rejects_out_of_range_rank_at_decode() {
        let result = serde_json::from_str::<UpdateUserRequest>(r#"{"Rank":9}"#);
        assert!(result.is_err());
    }
}
