//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse a datetime string (RFC3339 format) or return current time
///
/// Timestamps are stored as RFC3339 text in SQLite. A row that somehow holds
/// garbage falls back to the current time rather than failing the whole read.
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
