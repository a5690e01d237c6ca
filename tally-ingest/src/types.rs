use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;

/// One line item extracted from a statement, before it is stored or categorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive number means charge/spend; negative means payment/refund.
    pub value: f64,
}

/// Inclusive date range covered by a single statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StatementWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ParseError> {
        if start_date > end_date {
            return Err(ParseError::InvertedWindow {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Year of a transaction that only carries month + day.
    ///
    /// A transaction in the opening month belongs to the start year; anything
    /// else belongs to the end year. This splits windows like DEC 20 -> JAN 20
    /// across the calendar boundary.
    pub fn year_for_month(&self, month: u32) -> i32 {
        if month == self.start_date.month() {
            self.start_date.year()
        } else {
            self.end_date.year()
        }
    }
}

impl fmt::Display for StatementWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_for_month_across_new_year() {
        let window = StatementWindow::new(date(2019, 12, 20), date(2020, 1, 20)).unwrap();
        assert_eq!(window.year_for_month(12), 2019);
        assert_eq!(window.year_for_month(1), 2020);
        assert!(window.contains(date(2019, 12, 20)));
        assert!(window.contains(date(2020, 1, 20)));
        assert!(!window.contains(date(2020, 1, 21)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = StatementWindow::new(date(2020, 4, 22), date(2020, 3, 20)).unwrap_err();
        assert!(matches!(err, ParseError::InvertedWindow { .. }));
    }
}
