//! Pattern formatting: substitute calendar tokens in a template string.
//!
//! | Token | Field | Width |
//! |---|---|---|
//! | `YYYY` | year | 4+ |
//! | `MM` | month (01-12) | 2 |
//! | `DD` | day of month | 2 |
//! | `HH` | hour (00-23) | 2 |
//! | `mm` | minute | 2 |
//! | `ss` | second | 2 |
//! | `SSS` | millisecond | 3 |
//!
//! Tokens are case-sensitive and replaced wherever they occur, including
//! inside text meant as a literal: `"MMM"` renders as month + `M`. There is
//! no escape syntax.

use crate::input::IntoTimestamp;
use crate::parts::{extract_parts, CalendarParts, FormatOptions};

/// The pattern used by [`format_default`] and [`format_date`].
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";
pub const DATE_PATTERN: &str = "YYYY-MM-DD";
pub const TIME_PATTERN: &str = "HH:mm:ss";
pub const DATE_TIME_PATTERN: &str = "YYYY-MM-DD HH:mm:ss";

/// Format `input` with `pattern`.
///
/// Returns an empty string when the input is invalid or the time zone in
/// `options` is unknown.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use datekit::{format, FormatOptions};
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let options = FormatOptions::new().with_time_zone("Asia/Shanghai");
/// assert_eq!(format(dt, "YYYY/MM/DD HH:mm", &options), "2024/01/15 18:30");
/// assert_eq!(format("not-a-date", "YYYY", &options), "");
/// ```
pub fn format(input: impl IntoTimestamp, pattern: &str, options: &FormatOptions) -> String {
    extract_parts(input, options)
        .map(|parts| substitute(pattern, &parts))
        .unwrap_or_default()
}

/// Format `input` with [`DEFAULT_PATTERN`].
pub fn format_default(input: impl IntoTimestamp, options: &FormatOptions) -> String {
    format(input, DEFAULT_PATTERN, options)
}

/// `YYYY-MM-DD`
pub fn format_date(input: impl IntoTimestamp, options: &FormatOptions) -> String {
    format(input, DATE_PATTERN, options)
}

/// `HH:mm:ss`
pub fn format_time(input: impl IntoTimestamp, options: &FormatOptions) -> String {
    format(input, TIME_PATTERN, options)
}

/// `YYYY-MM-DD HH:mm:ss`
pub fn format_date_time(input: impl IntoTimestamp, options: &FormatOptions) -> String {
    format(input, DATE_TIME_PATTERN, options)
}

/// Same output as [`format_date`]; reads better where an ISO date is meant.
pub fn format_iso_date(input: impl IntoTimestamp, options: &FormatOptions) -> String {
    format_date(input, options)
}

fn substitute(pattern: &str, parts: &CalendarParts) -> String {
    let tokens = [
        ("YYYY", parts.year.as_str()),
        ("MM", parts.month.as_str()),
        ("DD", parts.day.as_str()),
        ("HH", parts.hour.as_str()),
        ("mm", parts.minute.as_str()),
        ("ss", parts.second.as_str()),
        ("SSS", parts.millisecond.as_str()),
    ];
    tokens
        .into_iter()
        .fold(pattern.to_string(), |out, (token, value)| out.replace(token, value))
}
