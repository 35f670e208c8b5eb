//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings and integers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidRank(i64),
    InvalidLocation(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRank(r) => write!(f, "Invalid rank: {}", r),
            ParseError::InvalidLocation(s) => write!(f, "Invalid location: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Role rank of a user
///
/// Ranks are ordered, so `UserRank::Pup < UserRank::Beta < UserRank::Alpha`.
/// On the wire and in the database a rank is its integer value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "i64", try_from = "i64")]
pub enum UserRank {
    #[default]
    Pup = 1,
    Beta = 2,
    Alpha = 3,
}

impl From<UserRank> for i64 {
    fn from(rank: UserRank) -> Self {
        rank as i64
    }
}

impl TryFrom<i64> for UserRank {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UserRank::Pup),
            2 => Ok(UserRank::Beta),
            3 => Ok(UserRank::Alpha),
            _ => Err(ParseError::InvalidRank(value)),
        }
    }
}

/// Last known safety location of a user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Safe,
    Warning,
    Unsafe,
    #[default]
    Unknown,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Safe,
        Location::Warning,
        Location::Unsafe,
        Location::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Safe => "safe",
            Location::Warning => "warning",
            Location::Unsafe => "unsafe",
            Location::Unknown => "unknown",
        }
    }
}

impl FromStr for Location {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Location::Safe),
            "warning" => Ok(Location::Warning),
            "unsafe" => Ok(Location::Unsafe),
            "unknown" => Ok(Location::Unknown),
            _ => Err(ParseError::InvalidLocation(s.to_string())),
        }
    }
}

/// Default account status for new users
pub const STATUS_ENABLED: &str = "enabled";

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub rank: UserRank,
    pub location: Location,
    pub status: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub rank: UserRank,
    pub location: Location,
    pub status: String,
    pub is_admin: bool,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let rank: i64 = row.try_get("rank")?;
        let location: String = row.try_get("location")?;
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            rank: UserRank::try_from(rank).unwrap_or_default(),
            location: Location::from_str(&location).unwrap_or_default(),
            status: row.try_get("status")?,
            is_admin: row.try_get("is_admin")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
