//! tally-ingest: statement text extraction seam and the statement parser.

pub mod error;
pub mod extract;
pub mod parsers;
pub mod types;

pub use error::{ExtractError, IngestError, ParseError};
pub use extract::{PlainTextExtractor, TextExtractor, parse_statement_file};
pub use parsers::statement::{StatementParser, parse_statement};
pub use types::{StatementWindow, Transaction};
