//! # Core Error Type
//!
//! Failures that can occur while constructing or parsing core values.
//! Verification-domain outcomes (unknown vehicle, mismatched proof) are
//! never errors; they are `false` results further up the stack.

use thiserror::Error;

/// Errors raised by `zkotp-core` constructors and parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A secret must contain at least one byte.
    #[error("secret must not be empty")]
    EmptySecret,

    /// Hex input had the wrong length for the target type.
    #[error("invalid hex length: expected {expected} chars, got {got}")]
    InvalidHexLength {
        /// Required number of hex characters.
        expected: usize,
        /// Number of characters supplied.
        got: usize,
    },

    /// Hex input contained a non-hex character.
    #[error("invalid hex character at offset {0}")]
    InvalidHexChar(usize),

    /// The clock reported a time before the Unix epoch.
    #[error("clock reading precedes the Unix epoch: {0}s")]
    ClockBeforeEpoch(i64),

    /// The system random source failed.
    #[error("random source failure: {0}")]
    Random(String),
}
