//! # Proof Backend Trait (Sealed)
//!
//! The contract shared by every proof backend. A backend proves a
//! [`Statement`] (an OTP and the timestamp it was derived at) and verifies
//! an artifact against the statement the verifier reconstructs on its own.
//!
//! ## Sealed Trait
//!
//! Only backends defined in this crate implement [`ProofBackend`]. A
//! roadside unit must not accept a proof checked by an unvetted backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkotp_core::UnixTimestamp;
use zkotp_crypto::{create_proof, Otp};

/// Error during proof generation. Always an infrastructure failure.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The hash primitive could not produce a digest.
    #[error("hashing failure: {0}")]
    HashingFailure(String),

    /// An external toolchain step failed or produced unusable output.
    #[error("proof toolchain step `{step}` failed: {detail}")]
    Toolchain {
        /// Toolchain step name (e.g. `compile`, `generate-proof`).
        step: String,
        /// Exit status, stderr, or parse failure.
        detail: String,
    },

    /// Filesystem error while staging toolchain artifacts.
    #[error("proof I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during proof verification. Always an infrastructure failure; an
/// invalid proof is `Ok(false)`, not an error.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The hash primitive could not produce a digest.
    #[error("hashing failure: {0}")]
    HashingFailure(String),

    /// An external toolchain step could not be run.
    #[error("verification toolchain step `{step}` failed: {detail}")]
    Toolchain {
        /// Toolchain step name.
        step: String,
        /// Spawn error or other detail.
        detail: String,
    },

    /// Filesystem error while staging toolchain artifacts.
    #[error("verification I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The proof scheme an artifact was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofScheme {
    /// `SHA256(hex(otp) ‖ timestamp)` commitment.
    Commitment,
    /// Proof document produced by an external ZoKrates toolchain.
    Zokrates,
}

impl ProofScheme {
    /// Scheme identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commitment => "commitment",
            Self::Zokrates => "zokrates",
        }
    }
}

impl std::fmt::Display for ProofScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The claim a proof is bound to: knowledge of `otp` at `timestamp`.
///
/// The OTP is the private part; only the timestamp and the commitment to
/// the OTP are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    /// The OTP (private witness).
    pub otp: Otp,
    /// The timestamp the OTP was derived at (public).
    pub timestamp: UnixTimestamp,
}

impl Statement {
    /// Bind an OTP to its timestamp.
    pub fn new(otp: Otp, timestamp: UnixTimestamp) -> Self {
        Self { otp, timestamp }
    }

    /// Public inputs as field elements: the commitment split into two
    /// big-endian 128-bit limbs, then the timestamp.
    pub fn public_inputs(&self) -> [u128; 3] {
        let commitment = create_proof(&self.otp, self.timestamp);
        let (hi, lo) = commitment.digest().to_u128_limbs();
        [hi, lo, u128::from(self.timestamp.as_secs())]
    }
}

/// A proof as it travels from vehicle to roadside unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Scheme that produced `payload`.
    pub scheme: ProofScheme,
    /// Scheme-specific encoding: 64 hex chars for commitments, the proof
    /// JSON document for ZoKrates.
    pub payload: String,
}

impl ProofArtifact {
    /// Wrap a payload produced under `scheme`.
    pub fn new(scheme: ProofScheme, payload: impl Into<String>) -> Self {
        Self {
            scheme,
            payload: payload.into(),
        }
    }
}

impl std::fmt::Display for ProofArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scheme, self.payload)
    }
}

/// Private module that seals [`ProofBackend`].
mod private {
    pub trait Sealed {}
}

/// Sealed interface for a proof backend.
///
/// Implementations are `Send + Sync` so one backend instance can serve many
/// vehicles and a shared roadside unit concurrently.
pub trait ProofBackend: private::Sealed + Send + Sync + std::fmt::Debug {
    /// The scheme this backend produces and accepts.
    fn scheme(&self) -> ProofScheme;

    /// Prove knowledge of the statement's OTP.
    ///
    /// # Errors
    ///
    /// Any error is an infrastructure failure and aborts the attempt.
    fn prove(&self, statement: &Statement) -> Result<ProofArtifact, ProofError>;

    /// Check `proof` against the verifier's own reconstruction of the statement.
    ///
    /// Returns `Ok(false)` for proofs that are invalid, malformed, or of
    /// another scheme.
    ///
    /// # Errors
    ///
    /// Only when the backend cannot run.
    fn verify(&self, proof: &ProofArtifact, statement: &Statement) -> Result<bool, VerifyError>;
}

impl private::Sealed for crate::commitment::CommitmentBackend {}

#[cfg(feature = "zokrates")]
impl private::Sealed for crate::zokrates::ZokratesBackend {}

#[cfg(test)]
mod tests {
    use super::*;
    use zkotp_core::{Secret, UnixTimestamp};
    use zkotp_crypto::derive_otp;

    #[test]
    fn public_inputs_end_with_timestamp() {
        let ts = UnixTimestamp::from_secs(1_700_000_000);
        let otp = derive_otp(&Secret::try_from("mysecret").unwrap(), ts);
        let inputs = Statement::new(otp, ts).public_inputs();
        assert_eq!(inputs[2], 1_700_000_000);
        // Golden commitment 2c3baf2e... split into limbs.
        assert_eq!(inputs[0], 0x2c3baf2ef57abb0ab44ed0020004bd6a);
        assert_eq!(inputs[1], 0x2960f3ecf55031f510d754986aaffdc3);
    }

    #[test]
    fn artifact_display_prefixes_scheme() {
        let artifact = ProofArtifact::new(ProofScheme::Commitment, "ab");
        assert_eq!(artifact.to_string(), "commitment:ab");
    }

    #[test]
    fn scheme_serializes_snake_case() {
        let json = serde_json::to_string(&ProofScheme::Zokrates).unwrap();
        assert_eq!(json, "\"zokrates\"");
    }

    #[test]
    fn toolchain_error_display_names_step() {
        let err = ProofError::Toolchain {
            step: "setup".to_string(),
            detail: "exit status 1".to_string(),
        };
        assert!(err.to_string().contains("`setup`"));
    }
}
