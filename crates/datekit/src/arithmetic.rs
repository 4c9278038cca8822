//! Calendar arithmetic: day boundaries and day/minute/month offsets.
//!
//! Day and month operations work on wall-clock fields in a zone (the host
//! zone, or a named IANA zone through the `_in` variants) and then map the
//! result back to an instant, so "add one day" keeps the clock time across
//! DST transitions. [`add_minutes`] shifts the instant itself.
//!
//! Invalid input and results outside the representable range produce
//! [`Timestamp::Invalid`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;

use crate::input::IntoTimestamp;
use crate::timestamp::Timestamp;
use crate::zone::Zone;

// ── Day boundaries ──────────────────────────────────────────────────────────

/// `00:00:00.000` on the same local calendar date.
pub fn start_of_day(input: impl IntoTimestamp) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Local, start_of_day_wall)
}

/// [`start_of_day`] in a named zone.
pub fn start_of_day_in(input: impl IntoTimestamp, tz: &Tz) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Named(*tz), start_of_day_wall)
}

/// `23:59:59.999` on the same local calendar date.
pub fn end_of_day(input: impl IntoTimestamp) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Local, end_of_day_wall)
}

/// [`end_of_day`] in a named zone.
pub fn end_of_day_in(input: impl IntoTimestamp, tz: &Tz) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Named(*tz), end_of_day_wall)
}

fn start_of_day_wall(wall: NaiveDateTime) -> Option<NaiveDateTime> {
    Some(wall.date().and_time(NaiveTime::MIN))
}

fn end_of_day_wall(wall: NaiveDateTime) -> Option<NaiveDateTime> {
    wall.date().and_hms_milli_opt(23, 59, 59, 999)
}

// ── Offsets ─────────────────────────────────────────────────────────────────

/// Move `days` calendar days, keeping the local clock time.
///
/// Month and year boundaries are crossed transparently. Across a DST change
/// the result is not a multiple of 24 hours away from the input.
pub fn add_days(input: impl IntoTimestamp, days: i64) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Local, |wall| {
        add_days_wall(wall, days)
    })
}

/// [`add_days`] in a named zone.
pub fn add_days_in(input: impl IntoTimestamp, days: i64, tz: &Tz) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Named(*tz), |wall| {
        add_days_wall(wall, days)
    })
}

fn add_days_wall(wall: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let date = wall.date().checked_add_signed(TimeDelta::try_days(days)?)?;
    Some(date.and_time(wall.time()))
}

/// Shift the instant by `minutes` × 60 seconds, regardless of zone.
pub fn add_minutes(input: impl IntoTimestamp, minutes: i64) -> Timestamp {
    input
        .into_timestamp()
        .and_then(|instant| instant.checked_add_signed(TimeDelta::try_minutes(minutes)?))
}

/// Move `months` calendar months, clamping the day to the target month.
///
/// The day of month is kept when the target month has it, and otherwise
/// becomes the target month's last day: January 31 plus one month is
/// February 29 in a leap year and February 28 otherwise. Clamping is lossy,
/// so adding and then subtracting months does not always return the input.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone};
/// use chrono_tz::UTC;
/// use datekit::add_months_in;
///
/// let jan31 = UTC.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
/// let feb = add_months_in(jan31, 1, &UTC).with_timezone(&UTC).unwrap();
/// assert_eq!(feb.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn add_months(input: impl IntoTimestamp, months: i64) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Local, |wall| {
        add_months_wall(wall, months)
    })
}

/// [`add_months`] in a named zone.
pub fn add_months_in(input: impl IntoTimestamp, months: i64, tz: &Tz) -> Timestamp {
    shift_wall_clock(input.into_timestamp(), Zone::Named(*tz), |wall| {
        add_months_wall(wall, months)
    })
}

fn add_months_wall(wall: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let day = wall.day();
    // Step from the 1st so the intermediate date cannot overflow.
    let first = month_start(i64::from(wall.year()), i64::from(wall.month0()).checked_add(months)?)?;
    let last = days_in_month(first.year(), first.month())?;
    let date = first.with_day(day.min(last))?;
    Some(date.and_time(wall.time()))
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Number of days in `month` (1-12) of `year`. `None` for a month outside
/// 1-12 or a year outside the supported range.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let first_next = month_start(i64::from(year), i64::from(month))?;
    Some(first_next.pred_opt()?.day())
}

/// The 1st of the month `month0` months after January of `year`.
///
/// `month0` may be negative or beyond 11; whole years carry over.
pub(crate) fn month_start(year: i64, month0: i64) -> Option<NaiveDate> {
    let total = year.checked_mul(12)?.checked_add(month0)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12) + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Map `ts` to wall-clock time in `zone`, apply `shift`, and map back.
fn shift_wall_clock<F>(ts: Timestamp, zone: Zone, shift: F) -> Timestamp
where
    F: FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
{
    ts.and_then(|instant| zone.to_instant(&shift(zone.to_local(&instant))?))
}
