//! Error types for datekit operations.
//!
//! The public formatting and arithmetic functions never return these: they
//! degrade to an empty string or [`Timestamp::Invalid`](crate::Timestamp).
//! The errors surface from the lower-level fallible constructors for callers
//! that want to know *why* an input was rejected.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Locale data unavailable: {0}")]
    LocaleData(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
