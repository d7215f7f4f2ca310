//! Fixture File Format
//!
//! ```text
//! Offset 0:      u32 LE  record_count (N)
//! Repeated N times:
//!   u32 LE  declared_length
//!   bytes   record_bytes
//! ```
//!
//! No magic, no version field.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};

pub const HEADER_SIZE: usize = 4;
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// How the declared record length relates to the bytes that follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    /// Declared length equals the record byte count.
    #[default]
    Exact,
    /// Declared length is the record byte count plus one, counting the
    /// stripped separator. Matches fixtures produced by the old script.
    Legacy,
}

impl LengthMode {
    /// Length prefix to emit for a record of `actual` bytes.
    pub fn declared_len(self, actual: u32) -> Option<u32> {
        match self {
            LengthMode::Exact => Some(actual),
            LengthMode::Legacy => actual.checked_add(1),
        }
    }

    /// Number of record bytes behind a `declared` length prefix.
    pub fn actual_len(self, declared: u32) -> Option<u32> {
        match self {
            LengthMode::Exact => Some(declared),
            LengthMode::Legacy => declared.checked_sub(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthMode::Exact => "exact",
            LengthMode::Legacy => "legacy",
        }
    }
}

/// Total fixture size for records of the given byte lengths.
pub fn encoded_size<I: IntoIterator<Item = usize>>(record_lens: I) -> u64 {
    record_lens
        .into_iter()
        .fold(HEADER_SIZE as u64, |acc, len| {
            acc + (LENGTH_PREFIX_SIZE + len) as u64
        })
}

/// Streams a fixture into `inner`, counting every byte it hands over.
pub struct RecordWriter<W: Write> {
    inner: W,
    mode: LengthMode,
    bytes_written: u64,
    records_written: u32,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W, mode: LengthMode) -> Self {
        Self {
            inner,
            mode,
            bytes_written: 0,
            records_written: 0,
        }
    }

    pub fn write_header(&mut self, record_count: u32) -> std::io::Result<()> {
        self.put(&record_count.to_le_bytes())
    }

    /// Write one record. The caller guarantees `record.len()` fits the mode.
    pub fn write_record(&mut self, record: &[u8]) -> std::io::Result<()> {
        let declared = u32::try_from(record.len())
            .ok()
            .and_then(|len| self.mode.declared_len(len))
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "record too long")
            })?;
        self.put(&declared.to_le_bytes())?;
        self.put(record)?;
        self.records_written += 1;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn records_written(&self) -> u32 {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn put(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }
}

/// Decode a fixture into its records, in file order.
///
/// Rejects truncated headers or records and any bytes left after the
/// declared number of records.
pub fn decode(data: &[u8], mode: LengthMode) -> Result<Vec<Vec<u8>>> {
    let mut cursor = Cursor { data, pos: 0 };
    let count = cursor
        .read_u32()
        .ok_or_else(|| FixtureError::malformed("truncated header"))?;

    let mut records = Vec::with_capacity((count as usize).min(data.len() / LENGTH_PREFIX_SIZE));
    for index in 0..count {
        let declared = cursor.read_u32().ok_or_else(|| {
            FixtureError::malformed(format!(
                "header declares {} records but only {} present",
                count, index
            ))
        })?;
        let len = mode.actual_len(declared).ok_or_else(|| {
            FixtureError::malformed(format!(
                "record {} declares length {} which is invalid in {} mode",
                index,
                declared,
                mode.as_str()
            ))
        })?;
        let bytes = cursor.read_bytes(len as usize).ok_or_else(|| {
            FixtureError::malformed(format!(
                "record {} declares {} bytes but the file ends first",
                index, len
            ))
        })?;
        records.push(bytes.to_vec());
    }

    let trailing = data.len() - cursor.pos;
    if trailing > 0 {
        return Err(FixtureError::malformed(format!(
            "{} trailing bytes after {} declared records",
            trailing, count
        )));
    }

    Ok(records)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
