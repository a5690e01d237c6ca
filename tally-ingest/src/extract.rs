//! Document-to-text extraction.
//!
//! Real statement documents are turned into text by an external service; the
//! parser only ever sees the resulting text. Callers inject whichever
//! extractor they have.

use std::fs;
use std::path::Path;

use crate::error::{ExtractError, IngestError};
use crate::parsers::statement::StatementParser;
use crate::types::Transaction;

/// Turns a statement document into raw text.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

impl<F> TextExtractor for F
where
    F: Fn(&Path) -> Result<String, ExtractError>,
{
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        self(path)
    }
}

/// Reads statements that were already extracted to UTF-8 `.txt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("text"));
        if !is_text {
            return Err(ExtractError::Unsupported(path.to_path_buf()));
        }

        fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Extract a statement document and parse its transactions.
pub fn parse_statement_file(
    extractor: &impl TextExtractor,
    parser: &StatementParser,
    path: impl AsRef<Path>,
) -> Result<Vec<Transaction>, IngestError> {
    let path = path.as_ref();
    let text = extractor.extract(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "extracted statement text");
    Ok(parser.parse(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::path::PathBuf;

    fn data_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join(name)
    }

    #[test]
    fn test_plain_text_extractor_reads_txt() {
        let text = PlainTextExtractor
            .extract(&data_path("sample_statement_text1.txt"))
            .unwrap();
        assert!(text.contains("STATEMENT FROM MAR 20 TO APR 22, 2019"));
    }

    #[test]
    fn test_plain_text_extractor_rejects_pdf() {
        let err = PlainTextExtractor
            .extract(Path::new("statement.pdf"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlainTextExtractor
            .extract(&data_path("does_not_exist.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_injected_extractor() {
        let fake = |_: &Path| -> Result<String, ExtractError> {
            Ok("STATEMENT FROM MAR 20 TO APR 22, 2019\nMAR 22 MAR 25 SHELL\n1\n$10.00\n".to_string())
        };
        let txns = parse_statement_file(&fake, &StatementParser::new(), "statement.pdf").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].value, 10.0);
    }

    #[test]
    fn test_parse_error_surfaces_through_file_parse() {
        let fake = |_: &Path| -> Result<String, ExtractError> { Ok("nothing here".to_string()) };
        let err = parse_statement_file(&fake, &StatementParser::new(), "x.pdf").unwrap_err();
        assert!(matches!(err, IngestError::Parse(ParseError::MissingWindow)));
    }
}
