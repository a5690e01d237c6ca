//! Calendar helpers: statement month abbreviations and (year, month) keys.

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month abbreviations as printed on statements (uppercase, case-sensitive).
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Month number (1-12) for an uppercase abbreviation like "MAR".
pub fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == abbr)
        .map(|i| i as u32 + 1)
}

/// Full English month name ("January") for a month number (1-12).
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Calendar month key used to group and order ledger rows.
///
/// Orders by year first, then month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Full month name, e.g. "December".
    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("")
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviations_are_case_sensitive() {
        assert_eq!(month_from_abbreviation("MAR"), Some(3));
        assert_eq!(month_from_abbreviation("DEC"), Some(12));
        assert_eq!(month_from_abbreviation("Mar"), None);
        assert_eq!(month_from_abbreviation("XYZ"), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_year_month_ordering() {
        let dec = YearMonth::of(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        let jan = YearMonth::of(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(dec < jan);
        assert_eq!(dec.to_string(), "December 2019");
        assert_eq!(jan, YearMonth::of(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()));
    }
}
