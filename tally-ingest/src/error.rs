use chrono::NaiveDate;
use std::path::PathBuf;

use crate::types::StatementWindow;

/// Errors raised while turning statement text into transactions.
///
/// Parsing is all-or-nothing: any of these means no transaction from the
/// statement should be stored.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No `STATEMENT FROM ... TO ...` range could be located.
    #[error("missing statement window")]
    MissingWindow,

    /// The window was found but no line item matched.
    #[error("no transactions found")]
    NoTransactions,

    /// A month abbreviation or day matched the pattern but is not a real date.
    #[error("invalid statement date \"{0}\"")]
    InvalidDate(String),

    /// An amount matched the pattern but could not be read as a number.
    #[error("invalid statement amount \"{0}\"")]
    InvalidAmount(String),

    #[error("statement window starts on {start}, after it ends on {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },

    /// Only raised by a parser configured with a strict window.
    #[error("transaction dated {date} falls outside the statement window {window}")]
    OutsideWindow {
        date: NaiveDate,
        window: StatementWindow,
    },

    #[error("invalid statement pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by a [`crate::TextExtractor`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document type: {}", .0.display())]
    Unsupported(PathBuf),
}

/// Failure anywhere between a statement document and its transactions.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
