//! # Protocol Errors
//!
//! Every variant here is an infrastructure or configuration failure. An
//! unknown vehicle, a stale timestamp, or a proof that does not match are
//! verification outcomes (`Ok(false)`), not errors.

use std::path::PathBuf;

use thiserror::Error;
use zkotp_core::CoreError;
use zkotp_zkp::{ProofError, VerifyError};

/// Error from the authentication pipeline.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Clock or core value failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The prover backend could not produce a proof.
    #[error("proof generation failed: {0}")]
    Proof(#[from] ProofError),

    /// The prover backend could not check a proof.
    #[error("proof verification failed: {0}")]
    Verify(#[from] VerifyError),

    /// The audit log could not record the attempt.
    #[error("audit failed: {0}")]
    Audit(#[from] AuditError),
}

/// Error from the ledger collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A stored record's digest does not match its contents.
    #[error("record #{sequence} digest mismatch: stored {stored}, recomputed {recomputed}")]
    DigestMismatch {
        /// Position of the record.
        sequence: u64,
        /// Digest stored in the record.
        stored: String,
        /// Digest recomputed from the record's fields.
        recomputed: String,
    },

    /// A record does not link to its predecessor.
    #[error("record #{sequence} prev_digest mismatch: expected {expected}, got {actual}")]
    BrokenLink {
        /// Position of the record.
        sequence: u64,
        /// Digest of the predecessor (or the genesis link).
        expected: String,
        /// The record's `prev_digest`.
        actual: String,
    },

    /// A record is stored out of order.
    #[error("sequence mismatch: expected {expected}, got {actual}")]
    SequenceMismatch {
        /// Position in the chain.
        expected: u64,
        /// Sequence stored in the record.
        actual: u64,
    },

    /// The ledger cannot accept further records.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Error while recording an attempt in the audit log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The ledger rejected the append.
    #[error("ledger append failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Error while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for the expected shape.
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds an out-of-range value.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_is_transparent() {
        let err = ProtocolError::from(CoreError::ClockBeforeEpoch(-1));
        assert_eq!(err.to_string(), CoreError::ClockBeforeEpoch(-1).to_string());
    }

    #[test]
    fn audit_wraps_ledger() {
        let err = ProtocolError::from(AuditError::from(LedgerError::Unavailable("down".into())));
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn invalid_config_names_field() {
        let err = ConfigError::Invalid {
            field: "audit.anonymized_prefix_len",
            reason: "must be in 1..=64".into(),
        };
        assert!(err.to_string().contains("audit.anonymized_prefix_len"));
    }
}
