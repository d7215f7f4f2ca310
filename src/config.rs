//! Encoder configuration
//!
//! Defaults reproduce the fixed paths of the old preprocessing script. A JSON
//! file can override any subset of fields; CLI flags override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FixtureError, Result};
use crate::format::LengthMode;

pub const DEFAULT_SOURCE: &str = "assets/lang-english.txt";
pub const DEFAULT_TARGET: &str = "assets/data.bin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub length_mode: LengthMode,
    /// Capacity of the buffered writer wrapping the temporary target.
    pub buffer_capacity: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            target: PathBuf::from(DEFAULT_TARGET),
            length_mode: LengthMode::Exact,
            buffer_capacity: 1 << 20, // 1 MiB
        }
    }
}

impl EncoderConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(path, &content)
    }

    pub fn from_json(path: &Path, data: &str) -> Result<Self> {
        let config: EncoderConfig = serde_json::from_str(data).map_err(|e| FixtureError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if config.buffer_capacity == 0 {
            return Err(FixtureError::Config {
                path: path.to_path_buf(),
                reason: "buffer_capacity must be > 0".to_string(),
            });
        }
        Ok(config)
    }
}
