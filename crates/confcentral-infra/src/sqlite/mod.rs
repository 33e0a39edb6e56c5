//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod conference;
pub mod pool;
pub mod profile;
pub mod session;
pub mod speaker;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use confcentral_types::error::RepositoryError;

pub(crate) fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE"))
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Query(format!("invalid date '{s}': {e}")))
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Times are stored as fixed-width `HH:MM:SS` so string comparison in SQL
/// orders them the same way `NaiveTime` does.
pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, RepositoryError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .map_err(|e| RepositoryError::Query(format!("invalid time '{s}': {e}")))
}

pub(crate) fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub(crate) fn parse_json_list(s: &str, what: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(s).map_err(|e| RepositoryError::Query(format!("invalid {what} JSON: {e}")))
}

pub(crate) fn to_json_list(items: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(items).map_err(|e| RepositoryError::Query(e.to_string()))
}
