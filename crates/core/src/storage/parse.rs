//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::RecurrenceType;

fn conversion_error<E>(err: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(conversion_error)
}

/// Parse an optional UUID from a database string column
pub fn parse_uuid_opt(s: Option<String>) -> Result<Option<Uuid>, SqlError> {
    s.map(|s| parse_uuid(&s)).transpose()
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

/// Parse a calendar date stored as YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<NaiveDate, SqlError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(conversion_error)
}

/// Parse a wall-clock time stored as HH:MM:SS
pub fn parse_time(s: &str) -> Result<NaiveTime, SqlError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(conversion_error)
}

/// Parse an equipment tag list stored as a JSON array
pub fn parse_equipment(s: &str) -> Result<Vec<String>, SqlError> {
    serde_json::from_str(s).map_err(conversion_error)
}

/// Parse a recurrence type from its stored name
pub fn parse_recurrence_type(s: &str) -> Result<RecurrenceType, SqlError> {
    RecurrenceType::parse(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown recurrence type: {s}").into(),
        )
    })
}

/// Convert a Monday-based index (0 = Monday) to a weekday
fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a weekday set stored as comma-separated Monday-based indices
/// (e.g. "0,2,4" for Monday, Wednesday, Friday). Empty string means
/// no weekdays.
pub fn parse_weekdays(s: &str) -> Result<Vec<Weekday>, SqlError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|part| {
            let index: u32 = part.trim().parse().map_err(conversion_error)?;
            weekday_from_index(index).ok_or_else(|| {
                SqlError::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    format!("weekday index out of range: {index}").into(),
                )
            })
        })
        .collect()
}

/// Encode a weekday set as comma-separated Monday-based indices
pub fn weekdays_to_string(weekdays: &[Weekday]) -> String {
    weekdays
        .iter()
        .map(|w| w.num_days_from_monday().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
