//! Strict `YYYY-MM-DD` parsing with permissive calendar overflow.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use log::debug;
use regex::Regex;

use crate::arithmetic::month_start;
use crate::error::DateError;
use crate::timestamp::Timestamp;
use crate::zone::Zone;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]{4})-([0-9]{2})-([0-9]{2})\s*$").expect("ISO date pattern is valid")
});

/// Parse `YYYY-MM-DD` to local midnight on that date.
///
/// Surrounding whitespace is allowed; any other shape (other separators,
/// a time component, short fields) is [`Timestamp::Invalid`]. Month and day
/// are not range-checked: they overflow into the following month or year
/// the way a calendar constructor does, so `2024-02-30` is March 1st,
/// `2024-13-01` is January 1st 2025 and `2024-03-00` is February 29th.
///
/// # Examples
///
/// ```
/// use chrono_tz::UTC;
/// use datekit::{format_date, parse_iso_date_in, FormatOptions};
///
/// let options = FormatOptions::new().with_time_zone("UTC");
/// let ts = parse_iso_date_in("2024-02-30", &UTC);
/// assert_eq!(format_date(ts, &options), "2024-03-01");
/// assert!(!parse_iso_date_in("2024/01/01", &UTC).is_valid());
/// ```
pub fn parse_iso_date(text: &str) -> Timestamp {
    parse_in_zone(text, Zone::Local)
}

/// [`parse_iso_date`] at midnight in a named zone.
pub fn parse_iso_date_in(text: &str, tz: &Tz) -> Timestamp {
    parse_in_zone(text, Zone::Named(*tz))
}

fn parse_in_zone(text: &str, zone: Zone) -> Timestamp {
    match try_parse_iso_date(text, zone) {
        Ok(instant) => Timestamp::Valid(instant),
        Err(e) => {
            debug!("cannot parse ISO date: {e}");
            Timestamp::Invalid
        }
    }
}

fn try_parse_iso_date(text: &str, zone: Zone) -> Result<DateTime<Utc>, DateError> {
    let caps = ISO_DATE.captures(text).ok_or_else(|| {
        DateError::InvalidDatetime(format!("'{}': expected YYYY-MM-DD", text.trim()))
    })?;
    let field = |group: usize| -> Result<i64, DateError> {
        caps[group]
            .parse()
            .map_err(|_| DateError::InvalidDatetime(format!("'{}'", text.trim())))
    };
    let (year, month, day) = (field(1)?, field(2)?, field(3)?);

    let out_of_range = || DateError::OutOfRange(format!("'{}'", text.trim()));
    let date = overflowing_date(year, month, day).ok_or_else(out_of_range)?;
    zone.to_instant(&date.and_time(NaiveTime::MIN))
        .ok_or_else(out_of_range)
}

/// The date `month - 1` months and `day - 1` days after January 1st of `year`.
fn overflowing_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    month_start(year, month - 1)?.checked_add_signed(TimeDelta::try_days(day - 1)?)
}
