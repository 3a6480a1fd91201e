//! # Audit Log
//!
//! Records each verification outcome under an anonymized identity and
//! hands it to the ledger.
//!
//! ## Security Invariant
//!
//! The raw vehicle identifier never reaches the ledger or the log output;
//! only `SHA256(vehicle_id)` and its prefix do. The recorded outcome is the
//! verifier's result, and [`AuditLog::record`] returns it unchanged.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use zkotp_core::{UnixTimestamp, VehicleId};
use zkotp_crypto::{anonymize, fingerprint, DEFAULT_ANONYMIZED_PREFIX_LEN};
use zkotp_zkp::ProofArtifact;

use crate::error::AuditError;
use crate::ledger::{InMemoryLedger, Ledger, LedgerEvent, TransactionRef};

/// Hex length of the proof fingerprint stored in audit records.
pub const PROOF_FINGERPRINT_LEN: usize = 16;

/// Anonymizing front-end to a [`Ledger`].
#[derive(Debug)]
pub struct AuditLog {
    ledger: Arc<dyn Ledger>,
    prefix_len: usize,
    last: Mutex<Option<TransactionRef>>,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryLedger::new()))
    }
}

impl AuditLog {
    /// Audit log over `ledger` with the default anonymized-id length.
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self::with_prefix_len(ledger, DEFAULT_ANONYMIZED_PREFIX_LEN)
    }

    /// Audit log with a custom anonymized-id length (clamped to `1..=64`).
    pub fn with_prefix_len(ledger: Arc<dyn Ledger>, prefix_len: usize) -> Self {
        Self {
            ledger,
            prefix_len,
            last: Mutex::new(None),
        }
    }

    /// Record an attempt and return `verified` unchanged.
    ///
    /// # Errors
    ///
    /// [`AuditError::Ledger`] if the ledger rejects the append.
    pub fn record(
        &self,
        vehicle_id: &VehicleId,
        proof: &ProofArtifact,
        timestamp: UnixTimestamp,
        verified: bool,
    ) -> Result<bool, AuditError> {
        self.record_with_ref(vehicle_id, proof, timestamp, verified)
            .map(|(echo, _)| echo)
    }

    /// Like [`AuditLog::record`], also returning the reference of the
    /// record this call appended.
    ///
    /// # Errors
    ///
    /// [`AuditError::Ledger`] if the ledger rejects the append.
    pub fn record_with_ref(
        &self,
        vehicle_id: &VehicleId,
        proof: &ProofArtifact,
        timestamp: UnixTimestamp,
        verified: bool,
    ) -> Result<(bool, TransactionRef), AuditError> {
        let anon = anonymize(vehicle_id, self.prefix_len);
        let event = LedgerEvent {
            full_id_hash: anon.full_hash,
            anonymized_id: anon.short_id,
            timestamp,
            authenticated: verified,
            proof_fingerprint: fingerprint(&proof.payload, PROOF_FINGERPRINT_LEN),
        };
        let anonymized_id = event.anonymized_id.clone();
        let tx = self.ledger.append(event)?;
        *self.last.lock() = Some(tx);
        info!(
            target: "zkotp::audit",
            anonymized_id = %anonymized_id,
            %timestamp,
            authenticated = verified,
            tx = %tx,
            "recorded authentication attempt"
        );
        Ok((verified, tx))
    }

    /// Reference of the most recent successful append.
    pub fn last_transaction(&self) -> Option<TransactionRef> {
        *self.last.lock()
    }
}
