//! Validation System - byte-class rules for source lines
//!
//! Rules report the first offending byte of a line.
//! The encoder turns a violation into a fatal `EncodingError`.

use std::path::Path;

use crate::error::{FixtureError, Result};
use crate::wordlist::WordList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineViolation {
    pub rule: &'static str,
    /// Zero-based byte offset inside the line.
    pub offset: usize,
    pub byte: u8,
}

/// Validation rule trait - inspects one line, separator already stripped
pub trait LineRule {
    fn name(&self) -> &'static str;
    fn check(&self, line: &[u8]) -> Option<LineViolation>;
}

// --- Concrete Rules ---

/// Only single-byte ASCII characters are representable.
pub struct AsciiRule;

impl LineRule for AsciiRule {
    fn name(&self) -> &'static str { "ascii" }

    fn check(&self, line: &[u8]) -> Option<LineViolation> {
        line.iter()
            .position(|b| !b.is_ascii())
            .map(|offset| LineViolation {
                rule: self.name(),
                offset,
                byte: line[offset],
            })
    }
}

/// Consumers treat records as C strings in places, so NUL is refused.
pub struct NoNulRule;

impl LineRule for NoNulRule {
    fn name(&self) -> &'static str { "no_nul" }

    fn check(&self, line: &[u8]) -> Option<LineViolation> {
        line.iter()
            .position(|b| *b == 0)
            .map(|offset| LineViolation {
                rule: self.name(),
                offset,
                byte: 0,
            })
    }
}

/// Validator runs every rule over every line
pub struct LineValidator {
    rules: Vec<Box<dyn LineRule>>,
}

impl LineValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(AsciiRule), Box::new(NoNulRule)],
        }
    }

    /// Earliest violation in `line` across all rules.
    pub fn check_line(&self, line: &[u8]) -> Option<LineViolation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(line))
            .min_by_key(|v| v.offset)
    }

    /// Validate a whole word list; `path` is only used for error reporting.
    ///
    /// Line and column in the returned error are one-based.
    pub fn validate(&self, path: &Path, words: &WordList<'_>) -> Result<()> {
        for (index, line) in words.iter().enumerate() {
            if let Some(violation) = self.check_line(line) {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    rule = violation.rule,
                    "rejecting source line"
                );
                return Err(FixtureError::EncodingError {
                    path: path.to_path_buf(),
                    line: index + 1,
                    column: violation.offset + 1,
                    byte: violation.byte,
                });
            }
        }
        Ok(())
    }
}

impl Default for LineValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_line_passes() {
        let validator = LineValidator::new();
        assert_eq!(validator.check_line(b"hello world\t~"), None);
        assert_eq!(validator.check_line(b""), None);
    }

    #[test]
    fn test_non_ascii_rejected() {
        let violation = LineValidator::new().check_line("caf\u{e9}".as_bytes()).unwrap();
        assert_eq!(violation.rule, "ascii");
        assert_eq!(violation.offset, 3);
        assert_eq!(violation.byte, 0xc3);
    }

    #[test]
    fn test_earliest_violation_wins() {
        let violation = LineValidator::new().check_line(b"a\0b\xff").unwrap();
        assert_eq!(violation.rule, "no_nul");
        assert_eq!(violation.offset, 1);
    }

    #[test]
    fn test_validate_reports_line_and_column() {
        let words = WordList::parse(b"ok\nfine\nba\xe9d\n");
        let err = LineValidator::new()
            .validate(Path::new("words.txt"), &words)
            .unwrap_err();
        match err {
            FixtureError::EncodingError { line, column, byte, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, 3);
                assert_eq!(byte, 0xe9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
