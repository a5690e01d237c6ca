//! Credit card statement parser (extracted text)
//!
//! Expected text after document-to-text extraction:
//!   STATEMENT FROM MAR 20 TO APR 22, 2019
//!   ...
//!   MAR 22 MAR 25 TIM HORTONS TORONTO ON
//!   1
//!   $44.71
//!   APR 01 APR 01 PAYMENT - THANK YOU / PAIEMENT - MERCI
//!   3
//!   -$143.66
//!
//! Each line item is a transaction date, a posting date (ignored), the
//! description (possibly wrapped over several lines), a reference number line
//! and the amount. Rows only carry MMM DD, so years come from the statement
//! window.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use tally_core::time::month_from_abbreviation;

use crate::error::ParseError;
use crate::types::{StatementWindow, Transaction};

const WINDOW_PATTERN: &str = concat!(
    r"STATEMENT FROM (?P<start_mon>[A-Z]{3}) (?P<start_day>\d{2})(?:, (?P<start_year>\d{4}))?",
    r" TO (?P<end_mon>[A-Z]{3}) (?P<end_day>\d{2}), (?P<end_year>\d{4})"
);

// Continuation lines of a wrapped description never start with a digit or
// `$`, so the reference number line ends the description.
const LINE_ITEM_PATTERN: &str = concat!(
    r"\b(?P<mon>[A-Z]{3}) (?P<day>\d{2}) [A-Z]{3} \d{2} ",
    r"(?P<desc>[^\n]+(?:\n[^\n\d$][^\n]*)*)\n+",
    r"\d+\n+",
    r"(?P<amount>-?\$[\d,.]+)"
);

const AMOUNT_PATTERN: &str = r"^-?\$(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}$";

/// Parses statement text into transactions.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    strict_window: bool,
}

impl StatementParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject transactions dated outside the statement window instead of
    /// only warning about them.
    #[must_use]
    pub fn strict_window(mut self, strict: bool) -> Self {
        self.strict_window = strict;
        self
    }

    /// Parse a whole statement. Returns transactions in document order.
    pub fn parse(&self, raw_text: &str) -> Result<Vec<Transaction>, ParseError> {
        let text = raw_text.replace("\r\n", "\n");
        let window = statement_window(&text)?;
        let txns = statement_transactions(&text, &window)?;

        for txn in &txns {
            if window.contains(txn.date) {
                continue;
            }
            if self.strict_window {
                return Err(ParseError::OutsideWindow {
                    date: txn.date,
                    window,
                });
            }
            tracing::warn!(
                date = %txn.date,
                %window,
                description = %txn.description,
                "transaction dated outside statement window"
            );
        }

        tracing::debug!(count = txns.len(), %window, "parsed statement");
        Ok(txns)
    }
}

/// Parse a statement with default (lenient) settings.
pub fn parse_statement(raw_text: &str) -> Result<Vec<Transaction>, ParseError> {
    StatementParser::default().parse(raw_text)
}

/// Locate the `STATEMENT FROM <start> TO <end>` range.
///
/// The start date may omit its year, in which case the end year is used.
pub fn statement_window(text: &str) -> Result<StatementWindow, ParseError> {
    let re = Regex::new(WINDOW_PATTERN)?;
    let caps = re.captures(text).ok_or(ParseError::MissingWindow)?;

    let end_year = parse_year(&caps["end_year"])?;
    let end_date = date_from_parts(&caps["end_mon"], &caps["end_day"], end_year)?;

    let start_year = match caps.name("start_year") {
        Some(y) => parse_year(y.as_str())?,
        None => end_year,
    };
    let start_date = date_from_parts(&caps["start_mon"], &caps["start_day"], start_year)?;

    StatementWindow::new(start_date, end_date)
}

/// Extract every line item, resolving years against `window`.
pub fn statement_transactions(
    text: &str,
    window: &StatementWindow,
) -> Result<Vec<Transaction>, ParseError> {
    let re = Regex::new(LINE_ITEM_PATTERN)?;
    let amount_re = Regex::new(AMOUNT_PATTERN)?;

    let txns = re
        .captures_iter(text)
        .map(|caps| line_item(&caps, window, &amount_re))
        .collect::<Result<Vec<_>, _>>()?;

    if txns.is_empty() {
        return Err(ParseError::NoTransactions);
    }
    Ok(txns)
}

fn line_item(
    caps: &Captures<'_>,
    window: &StatementWindow,
    amount_re: &Regex,
) -> Result<Transaction, ParseError> {
    let month = month_from_abbreviation(&caps["mon"])
        .ok_or_else(|| ParseError::InvalidDate(format!("{} {}", &caps["mon"], &caps["day"])))?;
    let year = window.year_for_month(month);
    let date = date_from_parts(&caps["mon"], &caps["day"], year)?;

    Ok(Transaction {
        date,
        description: normalize_description(&caps["desc"]),
        value: parse_amount(&caps["amount"], amount_re)?,
    })
}

fn date_from_parts(mon: &str, day: &str, year: i32) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate(format!("{mon} {day}, {year}"));
    let month = month_from_abbreviation(mon).ok_or_else(invalid)?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_year(s: &str) -> Result<i32, ParseError> {
    s.parse()
        .map_err(|_| ParseError::InvalidDate(s.to_string()))
}

/// "-$1,234.56" -> -1234.56. Commas must group thousands.
fn parse_amount(raw: &str, amount_re: &Regex) -> Result<f64, ParseError> {
    if !amount_re.is_match(raw) {
        return Err(ParseError::InvalidAmount(raw.to_string()));
    }
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .parse()
        .map_err(|_| ParseError::InvalidAmount(raw.to_string()))
}

fn normalize_description(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
