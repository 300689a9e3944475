use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One raw input line, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: usize,
    pub text: String,
}

impl RawRecord {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// A single dataset: a `TC*` file, or a `TC*` folder for sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub path: PathBuf,
}

impl TestCase {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

/// Why a record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("not a number")]
    NotANumber,

    #[error("not an integer")]
    NotAnInteger,

    #[error("integer out of range")]
    IntegerOutOfRange,

    #[error("empty line")]
    EmptyLine,

    #[error("expected '<product> <quantity>'")]
    MalformedSale,

    #[error("quantity is not numeric")]
    InvalidQuantity,

    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("product '{product}' not in catalogue")]
    UnknownProduct { product: String },

    #[error("expected '<product> <price>'")]
    MalformedCatalogueEntry,

    #[error("price is not numeric")]
    InvalidPrice,

    #[error("price must be positive")]
    NonPositivePrice,

    #[error("duplicate product '{product}', first price kept")]
    DuplicateProduct { product: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub source: String,
    pub line: usize,
    pub content: String,
    pub reason: ParseError,
}

impl Diagnostic {
    pub fn new(source: &str, record: &RawRecord, content: &str, reason: ParseError) -> Self {
        Self {
            source: source.to_string(),
            line: record.line,
            content: content.to_string(),
            reason,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - line {}: '{}' skipped ({})",
            self.source, self.line, self.content, self.reason
        )
    }
}

/// Finalised aggregate of one test case plus everything rejected on the way.
#[derive(Debug, Clone)]
pub struct TransformResult<A> {
    pub aggregate: A,
    pub accepted: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl<A> TransformResult<A> {
    pub fn new(aggregate: A) -> Self {
        Self {
            aggregate,
            accepted: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn reject(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display_locates_the_line() {
        let record = RawRecord::new(7, "abc");
        let diagnostic = Diagnostic::new("TC1.txt", &record, "abc", ParseError::NotANumber);
        assert_eq!(
            diagnostic.to_string(),
            "TC1.txt - line 7: 'abc' skipped (not a number)"
        );
    }

    #[test]
    fn test_test_case_name_is_file_name() {
        let case = TestCase::new(PathBuf::from("data/P1/TC3.txt"));
        assert_eq!(case.name, "TC3.txt");
    }
}
