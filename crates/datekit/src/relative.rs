//! Relative-time phrases: "3 minutes ago", "in 2 days", "昨天".
//!
//! The signed distance between two instants is bucketed into one of six
//! tiers. Each step rounds the *previous step's rounded value* (half away
//! from zero), not the raw distance, so results at tier boundaries are
//! stable and reproducible:
//!
//! | Tier | Value | Used while |
//! |---|---|---|
//! | second | round(ms / 1000) | < 60 |
//! | minute | round(seconds / 60) | < 60 |
//! | hour | round(minutes / 60) | < 24 |
//! | day | round(hours / 24) | < 30 |
//! | month | round(days / 30) | < 12 |
//! | year | round(months / 12) | always |
//!
//! Phrases come from the CLDR relative-time patterns ICU4X ships, in the
//! long style.

use chrono::{DateTime, Utc};
use fixed_decimal::{Decimal, Sign};
use icu::experimental::relativetime::options::Numeric as IcuNumeric;
use icu::experimental::relativetime::{RelativeTimeFormatter, RelativeTimeFormatterOptions};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::DateError;
use crate::input::IntoTimestamp;
use crate::locale::{Locale, DEFAULT_LOCALE};
use crate::timestamp::Timestamp;

/// `(tier, divisor from the previous value, exclusive upper bound)`.
const TIERS: [(Tier, f64, f64); 6] = [
    (Tier::Second, 1000.0, 60.0),
    (Tier::Minute, 60.0, 60.0),
    (Tier::Hour, 60.0, 24.0),
    (Tier::Day, 24.0, 30.0),
    (Tier::Month, 30.0, 12.0),
    (Tier::Year, 12.0, f64::INFINITY),
];

/// The unit a relative time is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Second = 0,
    Minute = 1,
    Hour = 2,
    Day = 3,
    Month = 4,
    Year = 5,
}

/// Whether named phrases may replace numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Numeric {
    /// "yesterday", "now", "next month" where the locale has a phrase.
    #[default]
    Auto,
    /// Always a number: "1 day ago", "in 0 seconds".
    Always,
}

impl From<Numeric> for IcuNumeric {
    fn from(numeric: Numeric) -> Self {
        match numeric {
            Numeric::Auto => IcuNumeric::Auto,
            Numeric::Always => IcuNumeric::Always,
        }
    }
}

/// Options for [`format_relative_time`].
///
/// Deserializes from JSON with camelCase keys, e.g.
/// `{"baseDate": "2024-01-01T00:00:00Z", "locale": "en", "numeric": "always"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelativeTimeOptions {
    /// The "now" the input is compared against. `None` reads the system
    /// clock when formatting.
    pub base_date: Option<Timestamp>,
    /// BCP-47 language tag. Defaults to `zh-CN`.
    pub locale: String,
    pub numeric: Numeric,
}

impl Default for RelativeTimeOptions {
    fn default() -> Self {
        RelativeTimeOptions {
            base_date: None,
            locale: DEFAULT_LOCALE.to_string(),
            numeric: Numeric::Auto,
        }
    }
}

impl RelativeTimeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_date(mut self, base: impl IntoTimestamp) -> Self {
        self.base_date = Some(base.into_timestamp());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_numeric(mut self, numeric: Numeric) -> Self {
        self.numeric = numeric;
        self
    }
}

/// A distance bucketed into a tier, before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelativeTime {
    /// Absolute value in `tier` units.
    pub magnitude: u64,
    /// True when the instant lies before the base. A small negative distance
    /// that rounds to zero stays in the past.
    pub past: bool,
    pub tier: Tier,
}

impl RelativeTime {
    /// Bucket the distance from `base` to `instant`.
    pub fn between(instant: DateTime<Utc>, base: DateTime<Utc>) -> Self {
        let diff_ms = (instant - base).num_milliseconds() as f64;
        let (value, tier) = select_tier(diff_ms);
        RelativeTime {
            magnitude: value.abs() as u64,
            past: value.is_sign_negative(),
            tier,
        }
    }

    /// Render as a phrase in `locale`. Empty if the locale has no
    /// relative-time data.
    pub fn render(&self, locale: &Locale, numeric: Numeric) -> String {
        match formatter(self.tier, locale, numeric) {
            Ok(formatter) => formatter.format(self.signed_value()).to_string(),
            Err(e) => {
                warn!("cannot render relative time: {e}");
                String::new()
            }
        }
    }

    /// The distance as a signed decimal. The past keeps its sign at zero.
    fn signed_value(&self) -> Decimal {
        let mut value = Decimal::from(i64::try_from(self.magnitude).unwrap_or(i64::MAX));
        if self.past {
            value.sign = Sign::Negative;
        }
        value
    }
}

fn formatter(
    tier: Tier,
    locale: &Locale,
    numeric: Numeric,
) -> Result<RelativeTimeFormatter, DateError> {
    let prefs = locale.as_icu().into();
    let options = RelativeTimeFormatterOptions {
        numeric: numeric.into(),
    };
    let formatter = match tier {
        Tier::Second => RelativeTimeFormatter::try_new_long_second(prefs, options),
        Tier::Minute => RelativeTimeFormatter::try_new_long_minute(prefs, options),
        Tier::Hour => RelativeTimeFormatter::try_new_long_hour(prefs, options),
        Tier::Day => RelativeTimeFormatter::try_new_long_day(prefs, options),
        Tier::Month => RelativeTimeFormatter::try_new_long_month(prefs, options),
        Tier::Year => RelativeTimeFormatter::try_new_long_year(prefs, options),
    };
    formatter.map_err(|e| DateError::LocaleData(format!("{tier:?} patterns for {locale}: {e}")))
}

/// Run the rounding cascade over a signed millisecond distance.
fn select_tier(diff_ms: f64) -> (f64, Tier) {
    let mut value = diff_ms;
    let mut tier = Tier::Second;
    for (candidate, divisor, limit) in TIERS {
        value = (value / divisor).round();
        tier = candidate;
        if value.abs() < limit {
            break;
        }
    }
    (value, tier)
}

/// Bucket the distance from `base` to `input` without rendering it.
///
/// `None` if either side is invalid.
pub fn relative_time(input: impl IntoTimestamp, base: impl IntoTimestamp) -> Option<RelativeTime> {
    let (instant, base) = match (input.into_timestamp(), base.into_timestamp()) {
        (Timestamp::Valid(instant), Timestamp::Valid(base)) => (instant, base),
        (instant, base) => {
            debug!("cannot compute relative time between {instant} and {base}");
            return None;
        }
    };
    Some(RelativeTime::between(instant, base))
}

/// Describe `input` relative to `options.base_date` (default: now).
///
/// Returns an empty string if the input or base is invalid.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use datekit::{format_relative_time, RelativeTimeOptions};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// let options = RelativeTimeOptions::new().with_base_date(base).with_locale("en");
/// assert_eq!(format_relative_time(base + Duration::seconds(185), &options), "in 3 minutes");
/// assert_eq!(format_relative_time(base - Duration::seconds(30), &options), "30 seconds ago");
/// assert_eq!(format_relative_time(base - Duration::days(1), &options), "yesterday");
/// ```
pub fn format_relative_time(input: impl IntoTimestamp, options: &RelativeTimeOptions) -> String {
    let base = options.base_date.unwrap_or_else(Timestamp::now);
    match relative_time(input, base) {
        Some(relative) => {
            relative.render(&Locale::parse_or_default(&options.locale), options.numeric)
        }
        None => String::new(),
    }
}
