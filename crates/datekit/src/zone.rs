//! Time zone projection: the host local zone or a named IANA zone.

use std::fmt;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::DateError;

/// The zone in which wall-clock fields are read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The host's local time zone.
    #[default]
    Local,
    /// An IANA time zone such as `Asia/Shanghai`.
    Named(Tz),
}

impl Zone {
    /// Parse an IANA time zone name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if the name is not in the
    /// time zone database.
    pub fn from_name(name: &str) -> Result<Zone, DateError> {
        Tz::from_str_insensitive(name.trim())
            .map(Zone::Named)
            .map_err(|_| DateError::InvalidTimezone(format!("'{}'", name)))
    }

    /// `None` selects the host zone.
    pub fn from_option(name: Option<&str>) -> Result<Zone, DateError> {
        name.map_or(Ok(Zone::Local), Zone::from_name)
    }

    /// Wall-clock date and time of `instant` in this zone.
    pub fn to_local(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// The instant at which this zone's clocks read `wall`.
    ///
    /// Ambiguous wall times (clocks turned back) resolve to the earlier
    /// instant. Wall times skipped by a forward transition are read with the
    /// offset in force before it, which moves them forward by the length of
    /// the gap: 02:30 on a New York spring-forward night reads 03:30, and
    /// 02:15 on Lord Howe's half-hour jump reads 02:45.
    pub fn to_instant(&self, wall: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => resolve_wall_clock(&Local, wall),
            Zone::Named(tz) => resolve_wall_clock(tz, wall),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn resolve_wall_clock<Z: TimeZone>(zone: &Z, wall: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(wall) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // A day back is before any gap, whatever the zone's offset.
            let day_before = wall.checked_sub_signed(TimeDelta::try_days(1)?)?;
            let before = zone.offset_from_utc_datetime(&day_before).fix();
            let offset = TimeDelta::try_seconds(i64::from(before.local_minus_utc()))?;
            wall.checked_sub_signed(offset).map(|utc| utc.and_utc())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(
            Zone::from_name("asia/shanghai").unwrap(),
            Zone::Named(chrono_tz::Asia::Shanghai)
        );
        assert_eq!(Zone::from_name(" UTC ").unwrap(), Zone::Named(chrono_tz::UTC));
    }

    #[test]
    fn test_from_name_invalid() {
        let err = Zone::from_name("Invalid/Zone").unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_from_option_none_is_local() {
        assert_eq!(Zone::from_option(None).unwrap(), Zone::Local);
    }

    #[test]
    fn test_to_local_named() {
        let zone = Zone::from_name("Asia/Tokyo").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap();
        assert_eq!(zone.to_local(&instant), wall(2024, 1, 16, 0, 30));
    }

    #[test]
    fn test_to_instant_round_trip() {
        let zone = Zone::from_name("America/New_York").unwrap();
        let instant = zone.to_instant(&wall(2026, 1, 15, 9, 0)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap());
        assert_eq!(zone.to_local(&instant), wall(2026, 1, 15, 9, 0));
    }

    #[test]
    fn test_to_instant_spring_forward_gap() {
        // March 8, 2026: New York clocks jump from 02:00 to 03:00
        let zone = Zone::from_name("America/New_York").unwrap();
        let instant = zone.to_instant(&wall(2026, 3, 8, 2, 30)).unwrap();
        assert_eq!(zone.to_local(&instant), wall(2026, 3, 8, 3, 30));
    }

    #[test]
    fn test_to_instant_half_hour_gap() {
        // October 6, 2024: Lord Howe moves from UTC+10:30 to UTC+11 at 02:00
        let zone = Zone::Named(chrono_tz::Australia::Lord_Howe);
        let instant = zone.to_instant(&wall(2024, 10, 6, 2, 15)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 10, 5, 15, 45, 0).unwrap());
        assert_eq!(zone.to_local(&instant), wall(2024, 10, 6, 2, 45));
    }

    #[test]
    fn test_to_instant_two_hour_gap() {
        // March 31, 2024: Troll jumps from UTC+0 to UTC+2 at 01:00
        let zone = Zone::Named(chrono_tz::Antarctica::Troll);
        let instant = zone.to_instant(&wall(2024, 3, 31, 1, 30)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap());
        assert_eq!(zone.to_local(&instant), wall(2024, 3, 31, 3, 30));
    }

    #[test]
    fn test_to_instant_skipped_day() {
        // Samoa skipped December 30, 2011, going from UTC-10 to UTC+14
        let zone = Zone::Named(chrono_tz::Pacific::Apia);
        let instant = zone.to_instant(&wall(2011, 12, 30, 0, 0)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2011, 12, 30, 10, 0, 0).unwrap());
        assert_eq!(zone.to_local(&instant), wall(2011, 12, 31, 0, 0));

        let instant = zone.to_instant(&wall(2011, 12, 30, 10, 0)).unwrap();
        assert_eq!(zone.to_local(&instant), wall(2011, 12, 31, 10, 0));
    }

    #[test]
    fn test_to_instant_fall_back_takes_earlier() {
        // November 1, 2026: 01:30 happens twice in New York, first in EDT (UTC-4)
        let zone = Zone::from_name("America/New_York").unwrap();
        let instant = zone.to_instant(&wall(2026, 11, 1, 1, 30)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Zone::Local.to_string(), "local");
        assert_eq!(Zone::from_name("europe/paris").unwrap().to_string(), "Europe/Paris");
    }
}
