//! Error types for roster loading and criteria parsing.
//!
//! Date computation itself never fails: an unparseable wedding date is a
//! regular "undated" state, not an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Duplicate record id: {0}")]
    DuplicateId(u32),

    #[error("Record not found: {0}")]
    RecordNotFound(u32),

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
