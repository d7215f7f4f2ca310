//! Fixture Encoder - single entry point for word list conversion
//!
//! Every line is validated before the first byte is written. Output goes to a
//! temporary file next to the target which is renamed over it only once the
//! whole fixture is on disk; a failed run leaves the target as it was.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EncoderConfig;
use crate::error::{FixtureError, Result};
use crate::format::{decode, encoded_size, LengthMode, RecordWriter};
use crate::hashing::{sha256_hex, DigestWriter};
use crate::validation::LineValidator;
use crate::wordlist::{load_source, WordList};
use crate::ENCODER_VERSION;

/// Outcome of a successful `encode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub record_count: u32,
    pub bytes_written: u64,
    pub length_mode: LengthMode,
    pub sha256: String,
    pub encoder_version: String,
    pub created_at: DateTime<Utc>,
}

/// Shape of an existing fixture, as reported by `inspect` and `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSummary {
    pub path: PathBuf,
    pub record_count: usize,
    pub total_bytes: usize,
    pub shortest: Option<usize>,
    pub longest: Option<usize>,
    pub empty_records: usize,
    pub length_mode: LengthMode,
    pub sha256: String,
}

impl FixtureSummary {
    fn from_records(path: &Path, data: &[u8], records: &[Vec<u8>], mode: LengthMode) -> Self {
        Self {
            path: path.to_path_buf(),
            record_count: records.len(),
            total_bytes: data.len(),
            shortest: records.iter().map(Vec::len).min(),
            longest: records.iter().map(Vec::len).max(),
            empty_records: records.iter().filter(|r| r.is_empty()).count(),
            length_mode: mode,
            sha256: sha256_hex(data),
        }
    }
}

pub struct FixtureEncoder {
    config: EncoderConfig,
    validator: LineValidator,
}

impl FixtureEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            validator: LineValidator::new(),
        }
    }

    pub fn with_length_mode(mut self, mode: LengthMode) -> Self {
        self.config.length_mode = mode;
        self
    }

    /// Adjusts the capacity of the buffered writer used for the target.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode the configured source into the configured target.
    pub fn run(&self) -> Result<EncodeReport> {
        self.encode(&self.config.source, &self.config.target)
    }

    /// Convert the word list at `source` into a fixture at `target`.
    ///
    /// # Errors
    ///
    /// `SourceNotFound` if the source cannot be read, `EncodingError` or
    /// `Overflow` if a line cannot be represented, `WriteError` if the target
    /// cannot be written. No fixture is left at `target` on any error.
    pub fn encode(&self, source: &Path, target: &Path) -> Result<EncodeReport> {
        let mode = self.config.length_mode;
        tracing::info!(
            source = %source.display(),
            target = %target.display(),
            length_mode = mode.as_str(),
            "encoding word list"
        );

        let data = load_source(source)?;
        let words = WordList::parse(&data);
        tracing::debug!(lines = words.len(), bytes = data.len(), "source loaded");

        let record_count = self.check(source, &words)?;

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source: std::io::Error| FixtureError::WriteError {
            path: target.to_path_buf(),
            source,
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".wordfixture-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let tmp = builder.tempfile_in(dir).map_err(write_err)?;
        tracing::debug!(tmp = %tmp.path().display(), "writing to temporary file");

        let buffered = BufWriter::with_capacity(self.config.buffer_capacity, DigestWriter::new(tmp));
        let (buffered, bytes_written) = self.write_fixture(&words, record_count, buffered, target)?;
        let (tmp, sha256) = buffered
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?
            .finish();
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(target).map_err(|e| write_err(e.error))?;

        let report = EncodeReport {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            record_count,
            bytes_written,
            length_mode: mode,
            sha256,
            encoder_version: ENCODER_VERSION.to_string(),
            created_at: Utc::now(),
        };
        tracing::info!(
            records = report.record_count,
            bytes = report.bytes_written,
            sha256 = %report.sha256,
            "fixture written"
        );
        Ok(report)
    }

    /// Encode source text held in memory. `name` labels errors.
    pub fn encode_bytes(&self, name: &Path, data: &[u8]) -> Result<Vec<u8>> {
        let words = WordList::parse(data);
        let record_count = self.check(name, &words)?;
        let (out, _) = self.write_fixture(&words, record_count, Vec::new(), name)?;
        Ok(out)
    }

    /// Re-encode `source` and require `fixture` to match it byte for byte.
    pub fn verify(&self, source: &Path, fixture: &Path) -> Result<FixtureSummary> {
        let mode = self.config.length_mode;
        let expected = self.encode_bytes(source, &load_source(source)?)?;
        let actual = load_fixture(fixture)?;
        let records = decode(&actual, mode)?;
        let summary = FixtureSummary::from_records(fixture, &actual, &records, mode);

        if let Some(offset) = expected.iter().zip(&actual).position(|(a, b)| a != b) {
            return Err(FixtureError::FormatInvariantViolation(format!(
                "{} differs from {} at byte {}",
                fixture.display(),
                source.display(),
                offset
            )));
        }
        if expected.len() != actual.len() {
            return Err(FixtureError::FormatInvariantViolation(format!(
                "{} is {} bytes, re-encoding {} gives {}",
                fixture.display(),
                actual.len(),
                source.display(),
                expected.len()
            )));
        }

        tracing::info!(fixture = %fixture.display(), records = summary.record_count, "fixture verified");
        Ok(summary)
    }

    /// Validate every line and make sure counts and lengths fit the format.
    fn check(&self, source: &Path, words: &WordList<'_>) -> Result<u32> {
        self.validator.validate(source, words)?;

        let mode = self.config.length_mode;
        for (index, line) in words.iter().enumerate() {
            let fits = u32::try_from(line.len())
                .ok()
                .and_then(|len| mode.declared_len(len))
                .is_some();
            if !fits {
                return Err(FixtureError::Overflow {
                    path: source.to_path_buf(),
                    what: format!("length of line {}", index + 1),
                });
            }
        }

        u32::try_from(words.len()).map_err(|_| FixtureError::Overflow {
            path: source.to_path_buf(),
            what: "line count".to_string(),
        })
    }

    fn write_fixture<W: Write>(
        &self,
        words: &WordList<'_>,
        record_count: u32,
        out: W,
        target: &Path,
    ) -> Result<(W, u64)> {
        let write_err = |source: std::io::Error| FixtureError::WriteError {
            path: target.to_path_buf(),
            source,
        };

        let mut writer = RecordWriter::new(out, self.config.length_mode);
        writer.write_header(record_count).map_err(write_err)?;
        for line in words.iter() {
            writer.write_record(line).map_err(write_err)?;
        }

        let expected = encoded_size(words.iter().map(<[u8]>::len));
        if writer.records_written() != record_count || writer.bytes_written() != expected {
            return Err(FixtureError::FormatInvariantViolation(format!(
                "wrote {} records in {} bytes, expected {} records in {} bytes",
                writer.records_written(),
                writer.bytes_written(),
                record_count,
                expected
            )));
        }

        let bytes_written = writer.bytes_written();
        let mut out = writer.into_inner();
        out.flush().map_err(write_err)?;
        Ok((out, bytes_written))
    }
}

impl Default for FixtureEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

/// Encode in-memory source text with the given length mode.
pub fn encode_bytes(data: &[u8], mode: LengthMode) -> Result<Vec<u8>> {
    FixtureEncoder::default()
        .with_length_mode(mode)
        .encode_bytes(Path::new("<memory>"), data)
}

fn load_fixture(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| FixtureError::FixtureUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode the fixture at `path` and summarize it.
pub fn inspect(path: &Path, mode: LengthMode) -> Result<FixtureSummary> {
    let data = load_fixture(path)?;
    let records = decode(&data, mode)?;
    Ok(FixtureSummary::from_records(path, &data, &records, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_beta_gamma_bytes() {
        let out = encode_bytes(b"alpha\nbeta\ngamma\n", LengthMode::Exact).unwrap();
        let mut expected = vec![3, 0, 0, 0];
        expected.extend_from_slice(&[5, 0, 0, 0]);
        expected.extend_from_slice(b"alpha");
        expected.extend_from_slice(&[4, 0, 0, 0]);
        expected.extend_from_slice(b"beta");
        expected.extend_from_slice(&[5, 0, 0, 0]);
        expected.extend_from_slice(b"gamma");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_source() {
        let out = encode_bytes(b"", LengthMode::Exact).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0]);
        assert!(decode(&out, LengthMode::Exact).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_with_empty_lines() {
        let source = b"one\n\n  two  \nthree";
        for mode in [LengthMode::Exact, LengthMode::Legacy] {
            let out = encode_bytes(source, mode).unwrap();
            let records = decode(&out, mode).unwrap();
            let expected: Vec<Vec<u8>> = WordList::parse(source)
                .iter()
                .map(<[u8]>::to_vec)
                .collect();
            assert_eq!(records, expected);
        }
    }

    #[test]
    fn test_legacy_declares_separator() {
        let out = encode_bytes(b"ab\n", LengthMode::Legacy).unwrap();
        assert_eq!(out, vec![1, 0, 0, 0, 3, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn test_non_ascii_rejected() {
        let err = encode_bytes("ok\nna\u{ef}ve\n".as_bytes(), LengthMode::Exact).unwrap_err();
        assert!(matches!(err, FixtureError::EncodingError { line: 2, column: 3, .. }));
    }

    #[test]
    fn test_builder_overrides() {
        let encoder = FixtureEncoder::default()
            .with_length_mode(LengthMode::Legacy)
            .with_buffer_capacity(0);
        assert_eq!(encoder.config().length_mode, LengthMode::Legacy);
        assert_eq!(encoder.config().buffer_capacity, 1);
    }
}
