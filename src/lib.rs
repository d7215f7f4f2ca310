//! wordfixture - word list to hash-map fixture encoder
//!
//! # Guarantees
//! 1. Header count equals the records written
//! 2. Every length prefix matches its record (per `LengthMode`)
//! 3. Same source, same bytes
//! 4. A failed run leaves no fixture behind

pub mod config;
pub mod encoder;
pub mod error;
pub mod format;
pub mod hashing;
pub mod validation;
pub mod wordlist;

pub use config::EncoderConfig;
pub use encoder::{encode_bytes, inspect, EncodeReport, FixtureEncoder, FixtureSummary};
pub use error::{FixtureError, Result};
pub use format::{decode, LengthMode};
pub use hashing::sha256_hex;
pub use wordlist::WordList;

pub const ENCODER_VERSION: &str = env!("CARGO_PKG_VERSION");
