//! # Commitment Backend
//!
//! The default backend. `prove()` returns the hex commitment
//! `SHA256(hex(otp) ‖ decimal(timestamp))`; `verify()` recomputes it from
//! the verifier's statement and compares in constant time.
//!
//! ## Security Warning
//!
//! **NOT ZERO-KNOWLEDGE.** Anyone holding the OTP can recompute the proof,
//! and the only protection of the secret is the preimage resistance of
//! SHA-256. This mirrors the simulated proof step of the protocol and is
//! kept that way on purpose.

use tracing::debug;
use zkotp_crypto::{create_proof, Commitment};

use crate::traits::{ProofArtifact, ProofBackend, ProofError, ProofScheme, Statement, VerifyError};

/// Hash-commitment proof backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitmentBackend;

impl ProofBackend for CommitmentBackend {
    fn scheme(&self) -> ProofScheme {
        ProofScheme::Commitment
    }

    fn prove(&self, statement: &Statement) -> Result<ProofArtifact, ProofError> {
        let commitment = create_proof(&statement.otp, statement.timestamp);
        Ok(ProofArtifact::new(ProofScheme::Commitment, commitment.to_hex()))
    }

    fn verify(&self, proof: &ProofArtifact, statement: &Statement) -> Result<bool, VerifyError> {
        if proof.scheme != ProofScheme::Commitment {
            debug!(scheme = %proof.scheme, "commitment backend rejects foreign proof scheme");
            return Ok(false);
        }
        let presented = match Commitment::from_hex(&proof.payload) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "malformed commitment payload");
                return Ok(false);
            }
        };
        let expected = create_proof(&statement.otp, statement.timestamp);
        Ok(expected.matches(&presented))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zkotp_core::{Secret, UnixTimestamp};
    use zkotp_crypto::derive_otp;

    fn statement(secret: &str, secs: u64) -> Statement {
        let ts = UnixTimestamp::from_secs(secs);
        Statement::new(derive_otp(&Secret::try_from(secret).unwrap(), ts), ts)
    }

    #[test]
    fn prove_golden_payload() {
        let proof = CommitmentBackend.prove(&statement("mysecret", 1_700_000_000)).unwrap();
        assert_eq!(proof.scheme, ProofScheme::Commitment);
        assert_eq!(
            proof.payload,
            "2c3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3"
        );
    }

    #[test]
    fn prove_then_verify() {
        let st = statement("s3cret", 42);
        let proof = CommitmentBackend.prove(&st).unwrap();
        assert!(CommitmentBackend.verify(&proof, &st).unwrap());
    }

    #[test]
    fn verify_rejects_other_timestamp() {
        let proof = CommitmentBackend.prove(&statement("s3cret", 42)).unwrap();
        assert!(!CommitmentBackend.verify(&proof, &statement("s3cret", 43)).unwrap());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let proof = CommitmentBackend.prove(&statement("secret-a", 42)).unwrap();
        assert!(!CommitmentBackend.verify(&proof, &statement("secret-b", 42)).unwrap());
    }

    #[test]
    fn malformed_payload_is_false_not_error() {
        let st = statement("s3cret", 42);
        for payload in [String::new(), "xyz".to_string(), "g".repeat(64), "a".repeat(63)] {
            let proof = ProofArtifact::new(ProofScheme::Commitment, payload);
            assert!(!CommitmentBackend.verify(&proof, &st).unwrap());
        }
    }

    #[test]
    fn case_changed_payload_is_false() {
        let st = statement("mysecret", 1_700_000_000);
        let mut proof = CommitmentBackend.prove(&st).unwrap();
        proof.payload = proof.payload.to_uppercase();
        assert!(!CommitmentBackend.verify(&proof, &st).unwrap());
    }

    #[test]
    fn ascii_case_bit_flip_is_false() {
        let st = statement("mysecret", 1_700_000_000);
        let proof = CommitmentBackend.prove(&st).unwrap();
        let mut bytes = proof.payload.clone().into_bytes();
        bytes[1] ^= 0x20;
        let flipped = ProofArtifact::new(ProofScheme::Commitment, String::from_utf8(bytes).unwrap());
        assert_ne!(flipped.payload, proof.payload);
        assert!(!CommitmentBackend.verify(&flipped, &st).unwrap());
    }

    #[test]
    fn foreign_scheme_is_false() {
        let st = statement("s3cret", 42);
        let mut proof = CommitmentBackend.prove(&st).unwrap();
        proof.scheme = ProofScheme::Zokrates;
        assert!(!CommitmentBackend.verify(&proof, &st).unwrap());
    }

    proptest! {
        #[test]
        fn prove_verify_round_trip(secret in "[a-zA-Z0-9]{1,32}", secs in any::<u64>()) {
            let st = statement(&secret, secs);
            let proof = CommitmentBackend.prove(&st).unwrap();
            prop_assert!(CommitmentBackend.verify(&proof, &st).unwrap());
        }
    }
}
