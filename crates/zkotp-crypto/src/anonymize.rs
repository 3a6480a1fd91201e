//! # Identity Anonymization
//!
//! Audit records never carry a raw vehicle identifier. They carry
//! `SHA256(vehicle_id)` in full, plus a short hex prefix of it for display
//! and quick reference. Both are one-way; the prefix is additionally lossy.

use serde::{Deserialize, Serialize};
use zkotp_core::{sha256_hex, Digest32, Sha256Accumulator, VehicleId, DIGEST_HEX_LEN};

/// Default length of the short anonymized identifier, in hex characters.
pub const DEFAULT_ANONYMIZED_PREFIX_LEN: usize = 10;

/// The anonymized forms of a vehicle identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedIdentity {
    /// Full `SHA256(vehicle_id)`.
    pub full_hash: Digest32,
    /// Leading hex characters of `full_hash`.
    pub short_id: String,
}

/// Hash a vehicle identifier and truncate a display prefix.
///
/// `prefix_len` is clamped to `1..=64`.
pub fn anonymize(vehicle_id: &VehicleId, prefix_len: usize) -> AnonymizedIdentity {
    let mut acc = Sha256Accumulator::new();
    acc.update(vehicle_id.as_bytes());
    let full_hash = acc.finalize();
    let len = prefix_len.clamp(1, DIGEST_HEX_LEN);
    let short_id = full_hash.to_hex()[..len].to_string();
    AnonymizedIdentity {
        full_hash,
        short_id,
    }
}

/// Leading `len` hex characters of `SHA256(data)`, clamped to `1..=64`.
pub fn fingerprint(data: impl AsRef<[u8]>, len: usize) -> String {
    let mut hex = sha256_hex(data);
    hex.truncate(len.clamp(1, DIGEST_HEX_LEN));
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_anonymized_id() {
        let anon = anonymize(&VehicleId::from("VEH001"), DEFAULT_ANONYMIZED_PREFIX_LEN);
        assert_eq!(anon.short_id, "8f44b06760");
        assert_eq!(
            anon.full_hash.to_hex(),
            "8f44b06760ffbd119e7a27dc93a56404e3fd55fbf7a3134234566a72cc3fd592"
        );
    }

    #[test]
    fn short_id_is_prefix_of_full_hash() {
        let anon = anonymize(&VehicleId::from("VEH123"), 16);
        assert!(anon.full_hash.to_hex().starts_with(&anon.short_id));
        assert_eq!(anon.short_id.len(), 16);
    }

    #[test]
    fn prefix_len_clamped() {
        let id = VehicleId::from("VEH001");
        assert_eq!(anonymize(&id, 0).short_id.len(), 1);
        assert_eq!(anonymize(&id, 500).short_id.len(), 64);
    }

    #[test]
    fn anonymized_form_omits_raw_id() {
        let anon = anonymize(&VehicleId::from("VEH001"), 64);
        let json = serde_json::to_string(&anon).unwrap();
        assert!(!json.contains("VEH001"));
    }

    #[test]
    fn fingerprint_golden() {
        let proof = "2c3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3";
        assert_eq!(fingerprint(proof, 16), "2a0be2a747b159ff");
    }
}
