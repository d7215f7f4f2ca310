//! Error taxonomy for a conversion run.
//!
//! Every variant is fatal to the run it came from; nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Source not found or unreadable: {}: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Encoding error in {} at line {line}, column {column}: byte 0x{byte:02x} is not allowed",
        .path.display()
    )]
    EncodingError {
        path: PathBuf,
        line: usize,
        column: usize,
        byte: u8,
    },

    #[error("Encoding error in {}: {what} does not fit in a u32", .path.display())]
    Overflow { path: PathBuf, what: String },

    #[error("Write error on {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture not found or unreadable: {}: {source}", .path.display())]
    FixtureUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format invariant violation: {0}")]
    FormatInvariantViolation(String),

    #[error("Malformed fixture: {reason}")]
    MalformedFixture { reason: String },

    #[error("Config error in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl FixtureError {
    /// Process exit code the CLI reports for this error.
    ///
    /// Rejected input data exits with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            FixtureError::EncodingError { .. }
            | FixtureError::Overflow { .. }
            | FixtureError::MalformedFixture { .. } => 2,
            _ => 1,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FixtureError::SourceNotFound { .. } => "source_not_found",
            FixtureError::EncodingError { .. } | FixtureError::Overflow { .. } => "encoding_error",
            FixtureError::WriteError { .. } => "write_error",
            FixtureError::FixtureUnreadable { .. } => "fixture_unreadable",
            FixtureError::FormatInvariantViolation(_) => "format_invariant_violation",
            FixtureError::MalformedFixture { .. } => "malformed_fixture",
            FixtureError::Config { .. } => "config_error",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FixtureError::MalformedFixture {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
