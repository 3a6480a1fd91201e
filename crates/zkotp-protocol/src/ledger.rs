//! # Ledger Stub
//!
//! The audit log writes to a [`Ledger`]. The in-memory implementation is a
//! hash chain: every record commits to its predecessor's digest, so a
//! record cannot be dropped, reordered, or replayed at another position
//! without breaking [`InMemoryLedger::verify_chain`].
//!
//! ```text
//! digest = SHA256( "zkotp.audit.v1" || LE64(sequence) || prev_digest
//!                  || full_id_hash || LE64(timestamp) || authenticated
//!                  || proof_fingerprint )
//! ```
//!
//! The first record links to the all-zero digest.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use zkotp_core::{Digest32, Sha256Accumulator, UnixTimestamp};

use crate::error::LedgerError;

/// Domain separation tag for audit record digests.
pub const AUDIT_DOMAIN_TAG: &[u8] = b"zkotp.audit.v1";

/// An audit entry as submitted to the ledger, before chaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// `SHA256(vehicle_id)`.
    pub full_id_hash: Digest32,
    /// Short hex prefix of `full_id_hash`.
    pub anonymized_id: String,
    /// Timestamp presented with the proof.
    pub timestamp: UnixTimestamp,
    /// The verifier's result.
    pub authenticated: bool,
    /// Short hex prefix of `SHA256(proof payload)`.
    pub proof_fingerprint: String,
}

/// A chained audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Zero-based position in the chain.
    pub sequence: u64,
    /// Short hex prefix of `full_id_hash`.
    pub anonymized_id: String,
    /// `SHA256(vehicle_id)`.
    pub full_id_hash: Digest32,
    /// Timestamp the vehicle presented.
    pub timestamp: UnixTimestamp,
    /// The verifier's result.
    pub authenticated: bool,
    /// Leading hex characters of `SHA256(proof payload)`.
    pub proof_fingerprint: String,
    /// Digest of the preceding record, zero for the first.
    pub prev_digest: Digest32,
    /// Digest over this record's fields and `prev_digest`.
    pub digest: Digest32,
}

impl AuditRecord {
    /// Chain `event` at `sequence` after `prev_digest`.
    pub fn seal(event: LedgerEvent, sequence: u64, prev_digest: Digest32) -> Self {
        let mut record = Self {
            sequence,
            anonymized_id: event.anonymized_id,
            full_id_hash: event.full_id_hash,
            timestamp: event.timestamp,
            authenticated: event.authenticated,
            proof_fingerprint: event.proof_fingerprint,
            prev_digest,
            digest: Digest32::zero(),
        };
        record.digest = record.compute_digest();
        record
    }

    /// Recompute the digest from the record's fields.
    pub fn compute_digest(&self) -> Digest32 {
        let mut acc = Sha256Accumulator::new();
        acc.update(AUDIT_DOMAIN_TAG)
            .update(self.sequence.to_le_bytes())
            .update(self.prev_digest.as_bytes())
            .update(self.full_id_hash.as_bytes())
            .update(self.timestamp.as_secs().to_le_bytes())
            .update([u8::from(self.authenticated)])
            .update(self.proof_fingerprint.as_bytes());
        acc.finalize()
    }

    /// This record's transaction reference.
    pub fn transaction_ref(&self) -> TransactionRef {
        TransactionRef(self.digest)
    }
}

/// Handle to an appended record. Renders as `0x` followed by the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRef(Digest32);

impl TransactionRef {
    /// Digest of the referenced record.
    pub fn digest(&self) -> &Digest32 {
        &self.0
    }
}

impl std::fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

/// Append-only store for audit events.
pub trait Ledger: Send + Sync + std::fmt::Debug {
    /// Append `event` and return its transaction reference.
    ///
    /// # Errors
    ///
    /// [`LedgerError`] if the ledger cannot accept the event.
    fn append(&self, event: LedgerEvent) -> Result<TransactionRef, LedgerError>;
}

/// In-process hash-chained ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: Mutex<Vec<AuditRecord>>,
    capacity: Option<usize>,
}

impl InMemoryLedger {
    /// Unbounded ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger that refuses appends once it holds `capacity` records.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    /// Snapshot of all records in order.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Number of appended records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Digest of the latest record, or the zero digest when empty.
    pub fn head(&self) -> Digest32 {
        self.records
            .lock()
            .last()
            .map_or_else(Digest32::zero, |r| r.digest)
    }

    /// Re-derive every digest and link.
    ///
    /// # Errors
    ///
    /// The first inconsistency found, in chain order.
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        verify_records(&self.records.lock())
    }
}

impl Ledger for InMemoryLedger {
    fn append(&self, event: LedgerEvent) -> Result<TransactionRef, LedgerError> {
        let mut records = self.records.lock();
        if let Some(cap) = self.capacity {
            if records.len() >= cap {
                return Err(LedgerError::Unavailable(format!(
                    "capacity of {cap} records reached"
                )));
            }
        }
        let prev = records.last().map_or_else(Digest32::zero, |r| r.digest);
        let record = AuditRecord::seal(event, records.len() as u64, prev);
        let tx = record.transaction_ref();
        records.push(record);
        Ok(tx)
    }
}

/// Check a sequence of records as a chain starting from the zero digest.
///
/// # Errors
///
/// The first inconsistency found.
pub fn verify_records(records: &[AuditRecord]) -> Result<(), LedgerError> {
    let mut expected_prev = Digest32::zero();
    for (index, record) in records.iter().enumerate() {
        let index = index as u64;
        if record.sequence != index {
            return Err(LedgerError::SequenceMismatch {
                expected: index,
                actual: record.sequence,
            });
        }
        if record.prev_digest != expected_prev {
            return Err(LedgerError::BrokenLink {
                sequence: index,
                expected: expected_prev.to_hex(),
                actual: record.prev_digest.to_hex(),
            });
        }
        let recomputed = record.compute_digest();
        if recomputed != record.digest {
            return Err(LedgerError::DigestMismatch {
                sequence: index,
                stored: record.digest.to_hex(),
                recomputed: recomputed.to_hex(),
            });
        }
        expected_prev = record.digest;
    }
    Ok(())
}
