//! Locale tags and the digits a locale writes calendar fields with.
//!
//! Tags are parsed and canonicalized by ICU4X, and all locale data (digit
//! sets here, relative-time patterns in [`relative`](crate::relative)) comes
//! from the CLDR data compiled into `icu`.

use std::fmt;
use std::str::FromStr;

use fixed_decimal::Decimal;
use icu::decimal::options::DecimalFormatterOptions;
use icu::decimal::DecimalFormatter;
use icu::locale::{locale, Locale as IcuLocale};
use log::warn;

use crate::error::DateError;

/// The locale used when none is given or the given tag is malformed.
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ── Locale ──────────────────────────────────────────────────────────────────

/// A BCP-47 language tag such as `zh-CN`, `zh-Hant-TW` or `ar-EG-u-nu-latn`.
///
/// Parsing is case-insensitive and accepts `-` or `_` separators; the tag
/// displays in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(IcuLocale);

impl Locale {
    /// Parse `tag`, falling back to [`DEFAULT_LOCALE`] with a warning.
    pub fn parse_or_default(tag: &str) -> Locale {
        tag.parse().unwrap_or_else(|e| {
            warn!("{e}; falling back to {DEFAULT_LOCALE}");
            Locale::default()
        })
    }

    pub fn language(&self) -> &str {
        self.0.id.language.as_str()
    }

    pub fn script(&self) -> Option<&str> {
        self.0.id.script.as_ref().map(|script| script.as_str())
    }

    pub fn region(&self) -> Option<&str> {
        self.0.id.region.as_ref().map(|region| region.as_str())
    }

    pub fn as_icu(&self) -> &IcuLocale {
        &self.0
    }

    /// The digits this locale writes numbers with, honoring a `-u-nu-`
    /// extension. Latin digits if the locale has no decimal data.
    pub fn digits(&self) -> Digits {
        match DecimalFormatter::try_new((&self.0).into(), DecimalFormatterOptions::default()) {
            Ok(formatter) => Digits::from_formatter(&formatter),
            Err(e) => {
                warn!("no decimal data for {self}: {e}; using Latin digits");
                Digits::LATIN
            }
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(locale!("zh-CN"))
    }
}

impl FromStr for Locale {
    type Err = DateError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        tag.trim()
            .replace('_', "-")
            .parse::<IcuLocale>()
            .map(Locale)
            .map_err(|e| DateError::InvalidLocale(format!("'{}': {}", tag, e)))
    }
}

impl From<IcuLocale> for Locale {
    fn from(locale: IcuLocale) -> Self {
        Locale(locale)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ── Digits ──────────────────────────────────────────────────────────────────

/// A locale's decimal digits, zero first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digits([char; 10]);

impl Digits {
    pub const LATIN: Digits = Digits(['0', '1', '2', '3', '4', '5', '6', '7', '8', '9']);

    fn from_formatter(formatter: &DecimalFormatter) -> Digits {
        let mut digits = Digits::LATIN.0;
        for (value, slot) in (0i64..).zip(digits.iter_mut()) {
            let rendered = formatter.format(&Decimal::from(value)).to_string();
            // Skip bidi marks some locales put around numbers.
            if let Some(digit) = rendered.chars().find(|c| c.is_alphanumeric()) {
                *slot = digit;
            }
        }
        Digits(digits)
    }

    pub fn zero(&self) -> char {
        self.0[0]
    }

    /// Rewrite the ASCII digits of `ascii` in this digit set.
    pub fn transliterate(&self, ascii: &str) -> String {
        ascii
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => self.0[d as usize],
                None => c,
            })
            .collect()
    }
}
