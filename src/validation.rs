use chrono::NaiveDate;
use thiserror::Error;

pub const MAX_DAYS: i64 = 366;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("start must be a date in YYYY-MM-DD format, got {0:?}")]
    InvalidDate(String),
    #[error("days must be between 0 and {}", MAX_DAYS)]
    DaysOutOfRange,
}

pub fn parse_start(raw: Option<&str>, default: NaiveDate) -> Result<NaiveDate, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| QueryError::InvalidDate(value.to_string())),
    }
}

pub fn validate_days(value: i64) -> Result<i64, QueryError> {
    if (0..=MAX_DAYS).contains(&value) {
        Ok(value)
    } else {
        Err(QueryError::DaysOutOfRange)
    }
}
