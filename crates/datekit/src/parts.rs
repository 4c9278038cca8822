//! Locale-aware extraction of zero-padded calendar and clock fields.

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::DateError;
use crate::input::IntoTimestamp;
use crate::locale::{Digits, Locale, DEFAULT_LOCALE};
use crate::timestamp::Timestamp;
use crate::zone::Zone;

/// Options for [`extract_parts`] and the pattern formatters.
///
/// Deserializes from JSON with camelCase keys, e.g.
/// `{"locale": "en-US", "timeZone": "America/New_York"}`. Missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// BCP-47 language tag. Defaults to `zh-CN`.
    pub locale: String,
    /// IANA time zone name. `None` uses the host's local zone.
    pub time_zone: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            locale: DEFAULT_LOCALE.to_string(),
            time_zone: None,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

/// Calendar and clock fields of an instant as seen in one zone and locale.
///
/// Every field is zero-padded: year to at least four digits (with a leading
/// `-` before year 1), millisecond to three, the rest to two. Hours run
/// `00`-`23`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarParts {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub millisecond: String,
}

impl CalendarParts {
    fn from_wall_clock(wall: &NaiveDateTime, digits: Digits) -> Self {
        let year = wall.year();
        let year = if year < 0 {
            format!("{year:05}")
        } else {
            format!("{year:04}")
        };
        // A leap second reports nanoseconds past 1e9.
        let millisecond = (wall.nanosecond() / 1_000_000).min(999);

        let localize = |ascii: String| digits.transliterate(&ascii);
        CalendarParts {
            year: localize(year),
            month: localize(format!("{:02}", wall.month())),
            day: localize(format!("{:02}", wall.day())),
            hour: localize(format!("{:02}", wall.hour())),
            minute: localize(format!("{:02}", wall.minute())),
            second: localize(format!("{:02}", wall.second())),
            millisecond: localize(format!("{millisecond:03}")),
        }
    }
}

/// Extract [`CalendarParts`] for `input` under `options`.
///
/// Returns `None` when the input is invalid or the time zone is unknown.
/// A malformed locale tag falls back to the default locale.
pub fn extract_parts(input: impl IntoTimestamp, options: &FormatOptions) -> Option<CalendarParts> {
    match try_extract_parts(input.into_timestamp(), options) {
        Ok(parts) => Some(parts),
        Err(e @ DateError::InvalidTimezone(_)) => {
            warn!("cannot extract calendar parts: {e}");
            None
        }
        Err(e) => {
            debug!("cannot extract calendar parts: {e}");
            None
        }
    }
}

fn try_extract_parts(ts: Timestamp, options: &FormatOptions) -> Result<CalendarParts, DateError> {
    let instant = ts.try_instant()?;
    let zone = Zone::from_option(options.time_zone.as_deref())?;
    let locale = Locale::parse_or_default(&options.locale);
    let wall = zone.to_local(&instant);
    Ok(CalendarParts::from_wall_clock(&wall, locale.digits()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc() -> FormatOptions {
        FormatOptions::new().with_time_zone("UTC")
    }

    #[test]
    fn test_default_options() {
        let options = FormatOptions::default();
        assert_eq!(options.locale, "zh-CN");
        assert_eq!(options.time_zone, None);
    }

    #[test]
    fn test_extract_zero_padded() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
            + chrono::Duration::milliseconds(7);
        let parts = extract_parts(dt, &utc()).unwrap();
        assert_eq!(parts.year, "2024");
        assert_eq!(parts.month, "03");
        assert_eq!(parts.day, "05");
        assert_eq!(parts.hour, "07");
        assert_eq!(parts.minute, "08");
        assert_eq!(parts.second, "09");
        assert_eq!(parts.millisecond, "007");
    }

    #[test]
    fn test_extract_midnight_is_hour_zero() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let parts = extract_parts(dt, &utc()).unwrap();
        assert_eq!(parts.hour, "00");
    }

    #[test]
    fn test_extract_projects_into_time_zone() {
        // 2024-01-15 20:30 UTC is already the 16th in Shanghai (UTC+8)
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap();
        let options = FormatOptions::new().with_time_zone("Asia/Shanghai");
        let parts = extract_parts(dt, &options).unwrap();
        assert_eq!((parts.day.as_str(), parts.hour.as_str()), ("16", "04"));
    }

    #[test]
    fn test_extract_small_and_negative_years() {
        let dt = Utc.with_ymd_and_hms(33, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(extract_parts(dt, &utc()).unwrap().year, "0033");

        let dt = Utc.with_ymd_and_hms(-44, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(extract_parts(dt, &utc()).unwrap().year, "-0044");

        let dt = Utc.with_ymd_and_hms(12345, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(extract_parts(dt, &utc()).unwrap().year, "12345");
    }

    #[test]
    fn test_extract_arabic_digits() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let options = FormatOptions::new().with_locale("ar-EG").with_time_zone("UTC");
        let parts = extract_parts(dt, &options).unwrap();
        assert_eq!(parts.year, "٢٠٢٤");
        assert_eq!(parts.minute, "٣٠");
    }

    #[test]
    fn test_extract_numbering_extension_overrides_default() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let options = FormatOptions::new()
            .with_locale("ar-EG-u-nu-latn")
            .with_time_zone("UTC");
        assert_eq!(extract_parts(dt, &options).unwrap().year, "2024");
    }

    #[test]
    fn test_extract_invalid_input_is_none() {
        assert_eq!(extract_parts("not-a-date", &utc()), None);
        assert_eq!(extract_parts(Timestamp::Invalid, &utc()), None);
    }

    #[test]
    fn test_extract_unknown_time_zone_is_none() {
        let options = FormatOptions::new().with_time_zone("Mars/Olympus_Mons");
        assert_eq!(extract_parts(0i64, &options), None);
    }

    #[test]
    fn test_extract_bad_locale_falls_back() {
        let options = FormatOptions::new().with_locale("!!").with_time_zone("UTC");
        let parts = extract_parts(0i64, &options).unwrap();
        assert_eq!(parts.year, "1970");
    }

    #[test]
    fn test_options_from_json() {
        let options: FormatOptions =
            serde_json::from_str(r#"{"locale":"en-US","timeZone":"America/New_York"}"#).unwrap();
        assert_eq!(options.locale, "en-US");
        assert_eq!(options.time_zone.as_deref(), Some("America/New_York"));

        let options: FormatOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, FormatOptions::default());
    }

    #[test]
    fn test_options_to_json() {
        let json = serde_json::to_string(&utc()).unwrap();
        assert_eq!(json, r#"{"locale":"zh-CN","timeZone":"UTC"}"#);
    }
}
