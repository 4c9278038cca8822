//! Input normalization: every accepted date-like shape becomes a [`Timestamp`].
//!
//! # Accepted shapes
//!
//! - Instants: [`Timestamp`], `chrono::DateTime<Tz>`, `std::time::SystemTime`
//! - Wall-clock values in the host zone: `NaiveDateTime`, `NaiveDate` (midnight)
//! - Epoch milliseconds: `i32`, `i64`, `u32`, `u64`, `f64` (truncated)
//! - Strings, restricted to an ISO-8601 subset (see below)
//! - `Option<T>` (`None` is invalid) and `serde_json::Value`
//!
//! # String forms
//!
//! Leading and trailing whitespace is ignored.
//!
//! | Form | Interpretation |
//! |---|---|
//! | `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00.5+08:00` | RFC 3339 instant |
//! | `2024`, `2024-01`, `2024-01-15` | UTC midnight |
//! | `2024-01-15T10:30`, `2024-01-15 10:30:00.250` | host local wall clock |
//!
//! Anything else, including out-of-range fields such as `2024-02-30`, is
//! invalid. Only [`parse_iso_date`](crate::parse_iso_date) rolls overflowing
//! days into the next month.

use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use log::debug;
use regex::Regex;

use crate::error::DateError;
use crate::timestamp::Timestamp;
use crate::zone::Zone;

static DATE_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})(?:-([0-9]{2})(?:-([0-9]{2}))?)?$")
        .expect("date-only pattern is valid")
});

static LOCAL_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})[Tt ]([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:[.,]([0-9]{1,9}))?)?$",
    )
    .expect("local date-time pattern is valid")
});

/// Conversion into a [`Timestamp`]. Shapes that cannot be interpreted
/// produce [`Timestamp::Invalid`] rather than an error.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Timestamp;
}

/// Whether `input` resolves to a finite, representable instant.
pub fn is_valid(input: impl IntoTimestamp) -> bool {
    input.into_timestamp().is_valid()
}

impl IntoTimestamp for Timestamp {
    fn into_timestamp(self) -> Timestamp {
        self
    }
}

impl IntoTimestamp for &Timestamp {
    fn into_timestamp(self) -> Timestamp {
        *self
    }
}

impl<Tz: TimeZone> IntoTimestamp for DateTime<Tz> {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::Valid(self.with_timezone(&Utc))
    }
}

impl<Tz: TimeZone> IntoTimestamp for &DateTime<Tz> {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::Valid(self.with_timezone(&Utc))
    }
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Timestamp {
        Zone::Local.to_instant(&self).into()
    }
}

impl IntoTimestamp for NaiveDate {
    fn into_timestamp(self) -> Timestamp {
        self.and_time(NaiveTime::MIN).into_timestamp()
    }
}

impl IntoTimestamp for SystemTime {
    fn into_timestamp(self) -> Timestamp {
        let millis = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok(),
            Err(before) => i64::try_from(before.duration().as_millis())
                .ok()
                .map(|m| -m),
        };
        millis.map_or(Timestamp::Invalid, Timestamp::from_millis)
    }
}

impl IntoTimestamp for i64 {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::from_millis(self)
    }
}

impl IntoTimestamp for i32 {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::from_millis(i64::from(self))
    }
}

impl IntoTimestamp for u32 {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::from_millis(i64::from(self))
    }
}

impl IntoTimestamp for u64 {
    fn into_timestamp(self) -> Timestamp {
        i64::try_from(self).map_or(Timestamp::Invalid, Timestamp::from_millis)
    }
}

impl IntoTimestamp for f64 {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::from_millis_f64(self)
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Timestamp {
        match parse_date_string(self) {
            Ok(instant) => Timestamp::Valid(instant),
            Err(e) => {
                debug!("treating input as invalid: {e}");
                Timestamp::Invalid
            }
        }
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Timestamp {
        self.as_str().into_timestamp()
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Timestamp {
        self.as_str().into_timestamp()
    }
}

impl<T: IntoTimestamp> IntoTimestamp for Option<T> {
    fn into_timestamp(self) -> Timestamp {
        self.map_or(Timestamp::Invalid, IntoTimestamp::into_timestamp)
    }
}

/// Numbers are epoch milliseconds and strings follow the string rules.
/// `null`, booleans, arrays and objects are invalid.
impl IntoTimestamp for &serde_json::Value {
    fn into_timestamp(self) -> Timestamp {
        match self {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(millis) => Timestamp::from_millis(millis),
                None => n
                    .as_f64()
                    .map_or(Timestamp::Invalid, Timestamp::from_millis_f64),
            },
            serde_json::Value::String(s) => s.as_str().into_timestamp(),
            other => {
                debug!("treating input as invalid: unsupported JSON value {other}");
                Timestamp::Invalid
            }
        }
    }
}

impl IntoTimestamp for serde_json::Value {
    fn into_timestamp(self) -> Timestamp {
        (&self).into_timestamp()
    }
}

// ── String parsing ──────────────────────────────────────────────────────────

/// Parse the supported ISO-8601 subset into an instant.
pub(crate) fn parse_date_string(s: &str) -> Result<DateTime<Utc>, DateError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(caps) = DATE_ONLY.captures(s) {
        let year = capture_number(&caps, 1).unwrap_or(0) as i32;
        let month = capture_number(&caps, 2).unwrap_or(1);
        let day = capture_number(&caps, 3).unwrap_or(1);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateError::InvalidDatetime(format!("'{s}': no such date")))?;
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    if let Some(caps) = LOCAL_DATE_TIME.captures(s) {
        let date = NaiveDate::from_ymd_opt(
            capture_number(&caps, 1).unwrap_or(0) as i32,
            capture_number(&caps, 2).unwrap_or(0),
            capture_number(&caps, 3).unwrap_or(0),
        )
        .ok_or_else(|| DateError::InvalidDatetime(format!("'{s}': no such date")))?;
        let nanos = caps.get(7).map_or(0, |m| fraction_to_nanos(m.as_str()));
        let time = NaiveTime::from_hms_nano_opt(
            capture_number(&caps, 4).unwrap_or(0),
            capture_number(&caps, 5).unwrap_or(0),
            capture_number(&caps, 6).unwrap_or(0),
            nanos,
        )
        .ok_or_else(|| DateError::InvalidDatetime(format!("'{s}': no such time")))?;
        return Zone::Local
            .to_instant(&date.and_time(time))
            .ok_or_else(|| DateError::OutOfRange(format!("'{s}'")));
    }

    Err(DateError::InvalidDatetime(format!(
        "'{s}': not an ISO-8601 date or date-time"
    )))
}

/// A captured group of ASCII digits, if it participated in the match.
fn capture_number(caps: &regex::Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// "5" → 500_000_000, "007" → 7_000_000.
fn fraction_to_nanos(digits: &str) -> u32 {
    let mut nanos: u32 = digits.parse().unwrap_or(0);
    for _ in digits.len()..9 {
        nanos *= 10;
    }
    nanos
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Local, Timelike};

    #[test]
    fn test_rfc3339_with_offset() {
        let ts = "2024-01-15T18:30:00+08:00".into_timestamp();
        assert_eq!(
            ts.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_rfc3339_fraction_and_whitespace() {
        let ts = "  2024-01-15T10:30:00.25Z \n".into_timestamp();
        assert_eq!(ts.timestamp_millis().map(|m| m % 1000), Some(250));
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let ts = "2024-01-15".into_timestamp();
        assert_eq!(
            ts.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_year_and_year_month_forms() {
        assert_eq!(
            "2024".into_timestamp().instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            "2024-06".into_timestamp().instant(),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_local_date_time_uses_host_zone() {
        let ts = "2024-01-15T10:30:45.123".into_timestamp();
        let local = ts.with_timezone(&Local).unwrap();
        assert_eq!((local.year(), local.month(), local.day()), (2024, 1, 15));
        assert_eq!((local.hour(), local.minute(), local.second()), (10, 30, 45));
        assert_eq!(local.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_space_separated_date_time() {
        let a = "2024-01-15 10:30".into_timestamp();
        let b = "2024-01-15T10:30:00".into_timestamp();
        assert!(a.is_valid());
        assert_eq!(a, b);
    }

    #[test]
    fn test_unsupported_strings_are_invalid() {
        for s in [
            "not-a-date",
            "",
            "2024/01/15",
            "15.01.2024",
            "2024-1-5",
            "2024-02-30",
            "2024-13-01",
            "2024-01-15T25:00",
            "yesterday",
        ] {
            assert!(!is_valid(s), "expected invalid: {s:?}");
        }
    }

    #[test]
    fn test_numbers_are_epoch_millis() {
        assert_eq!(86_400_000i64.into_timestamp().timestamp_millis(), Some(86_400_000));
        assert_eq!(1000i32.into_timestamp().timestamp_millis(), Some(1000));
        assert_eq!(1000u32.into_timestamp().timestamp_millis(), Some(1000));
        assert_eq!(1000.75f64.into_timestamp().timestamp_millis(), Some(1000));
        assert!(!u64::MAX.into_timestamp().is_valid());
        assert!(!f64::NAN.into_timestamp().is_valid());
    }

    #[test]
    fn test_system_time() {
        let t = UNIX_EPOCH + std::time::Duration::from_millis(1234);
        assert_eq!(t.into_timestamp().timestamp_millis(), Some(1234));
        let t = UNIX_EPOCH - std::time::Duration::from_millis(1234);
        assert_eq!(t.into_timestamp().timestamp_millis(), Some(-1234));
    }

    #[test]
    fn test_chrono_values() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(dt.into_timestamp(), Timestamp::Valid(dt));
        assert_eq!((&dt).into_timestamp(), Timestamp::Valid(dt));

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let local = date.into_timestamp().with_timezone(&Local).unwrap();
        assert_eq!(local.date_naive(), date);
        assert_eq!(local.hour(), 0);
    }

    #[test]
    fn test_option_none_is_invalid() {
        assert!(!is_valid(None::<i64>));
        assert!(is_valid(Some(0i64)));
    }

    #[test]
    fn test_json_values() {
        use serde_json::json;
        assert_eq!(json!(1000).into_timestamp().timestamp_millis(), Some(1000));
        assert_eq!(json!(1000.9).into_timestamp().timestamp_millis(), Some(1000));
        assert!(json!("2024-01-15").into_timestamp().is_valid());
        assert!(!json!(null).into_timestamp().is_valid());
        assert!(!json!(true).into_timestamp().is_valid());
        assert!(!json!([2024, 1, 15]).into_timestamp().is_valid());
        assert!(!json!({"year": 2024}).into_timestamp().is_valid());
    }

    #[test]
    fn test_fraction_to_nanos() {
        assert_eq!(fraction_to_nanos("5"), 500_000_000);
        assert_eq!(fraction_to_nanos("007"), 7_000_000);
        assert_eq!(fraction_to_nanos("123456789"), 123_456_789);
    }
}
