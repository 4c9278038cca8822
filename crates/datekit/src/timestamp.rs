//! The core temporal value: an absolute instant or an explicit invalid marker.
//!
//! Every datekit function is total over its inputs. Instead of returning
//! `Result` or panicking on malformed input, functions that produce an
//! instant return [`Timestamp::Invalid`], and functions that consume one
//! propagate it (arithmetic) or degrade to an empty string (formatting).

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DateError;
use crate::input::IntoTimestamp;

/// An absolute instant, or the invalid sentinel.
///
/// Valid timestamps cover the range of `chrono::DateTime<Utc>` (roughly
/// ±262,000 years), which lies inside the ±8.64e15 ms range of host date
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    #[default]
    Invalid,
}

impl Timestamp {
    /// The current instant from the system clock.
    pub fn now() -> Self {
        Timestamp::Valid(Utc::now())
    }

    /// Milliseconds since the Unix epoch. Unrepresentable values are invalid.
    pub fn from_millis(millis: i64) -> Self {
        DateTime::from_timestamp_millis(millis).into()
    }

    /// Fractional milliseconds since the Unix epoch, truncated toward zero.
    ///
    /// NaN and infinities are invalid.
    pub fn from_millis_f64(millis: f64) -> Self {
        if !millis.is_finite() {
            return Timestamp::Invalid;
        }
        let truncated = millis.trunc();
        if truncated.abs() >= i64::MAX as f64 {
            return Timestamp::Invalid;
        }
        Timestamp::from_millis(truncated as i64)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Valid(dt) => Some(*dt),
            Timestamp::Invalid => None,
        }
    }

    /// Like [`instant`](Self::instant), but with an error for callers that
    /// propagate with `?`.
    pub fn try_instant(&self) -> Result<DateTime<Utc>, DateError> {
        self.instant()
            .ok_or_else(|| DateError::InvalidDatetime("invalid timestamp".to_string()))
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        self.instant().map(|dt| dt.timestamp_millis())
    }

    /// Project the instant into `tz`.
    pub fn with_timezone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.instant().map(|dt| dt.with_timezone(tz))
    }

    /// Chain a fallible instant computation. Invalid stays invalid, and a
    /// `None` from `f` becomes invalid.
    pub fn and_then<F>(self, f: F) -> Timestamp
    where
        F: FnOnce(DateTime<Utc>) -> Option<DateTime<Utc>>,
    {
        self.instant().and_then(f).into()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Valid(dt)
    }
}

impl From<Option<DateTime<Utc>>> for Timestamp {
    fn from(dt: Option<DateTime<Utc>>) -> Self {
        dt.map_or(Timestamp::Invalid, Timestamp::Valid)
    }
}

/// Valid timestamps order by instant. Comparisons involving an invalid
/// timestamp are unordered.
impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Timestamp::Valid(a), Timestamp::Valid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Valid(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Timestamp::Invalid => f.write_str("Invalid Date"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Valid(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Timestamp::Invalid => serializer.serialize_none(),
        }
    }
}

/// Accepts anything the input normalizer accepts: epoch milliseconds, or a
/// date string. Other JSON shapes deserialize to [`Timestamp::Invalid`].
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok((&value).into_timestamp())
    }
}
