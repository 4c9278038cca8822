//! # datekit
//!
//! Date formatting, calendar arithmetic, and relative-time phrases.
//!
//! Every function is total: malformed or out-of-range input never panics
//! and never returns `Err`. Formatters return an empty string, and functions
//! producing an instant return [`Timestamp::Invalid`], which later calls
//! propagate. Use [`is_valid`] to tell "no data" apart from a real instant.
//!
//! The system clock is only read when [`format_relative_time`] is called
//! without a base date.
//!
//! ## Modules
//!
//! - [`timestamp`] — The [`Timestamp`] value: an instant or the invalid marker
//! - [`input`] — Normalize instants, epoch millis, and ISO strings into timestamps
//! - [`parts`] — Zero-padded calendar fields for a zone and locale
//! - [`format`] — `YYYY-MM-DD HH:mm:ss.SSS` pattern formatting
//! - [`parse`] — Strict `YYYY-MM-DD` parsing with calendar overflow
//! - [`arithmetic`] — Day boundaries, day/minute offsets, clamped month offsets
//! - [`relative`] — "3 minutes ago" / "in 2 days" with tiered rounding
//! - [`locale`] — Language tags and locale digit sets
//! - [`zone`] — Host local zone or IANA zone projection
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono_tz::UTC;
//! use datekit::{add_months_in, format, parse_iso_date_in, FormatOptions};
//!
//! let options = FormatOptions::new().with_time_zone("UTC");
//! let jan31 = parse_iso_date_in("2023-01-31", &UTC);
//! assert_eq!(format(add_months_in(jan31, 1, &UTC), "YYYY/MM/DD", &options), "2023/02/28");
//! ```

pub mod arithmetic;
pub mod error;
pub mod format;
pub mod input;
pub mod locale;
pub mod parse;
pub mod parts;
pub mod relative;
pub mod timestamp;
pub mod zone;

pub use arithmetic::{
    add_days, add_days_in, add_minutes, add_months, add_months_in, days_in_month, end_of_day,
    end_of_day_in, start_of_day, start_of_day_in,
};
pub use error::DateError;
pub use format::{
    format, format_date, format_date_time, format_default, format_iso_date, format_time,
    DATE_PATTERN, DATE_TIME_PATTERN, DEFAULT_PATTERN, TIME_PATTERN,
};
pub use input::{is_valid, IntoTimestamp};
pub use locale::{Digits, Locale, DEFAULT_LOCALE};
pub use parse::{parse_iso_date, parse_iso_date_in};
pub use parts::{extract_parts, CalendarParts, FormatOptions};
pub use relative::{
    format_relative_time, relative_time, Numeric, RelativeTime, RelativeTimeOptions, Tier,
};
pub use timestamp::Timestamp;
pub use zone::Zone;
