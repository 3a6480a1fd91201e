//! # Authentication Attempt
//!
//! One pass through the handshake:
//!
//! ```text
//! Start ─▶ OtpGenerated ─▶ ProofCreated ─▶ Verified ─▶ [Audited] ─▶ Decided
//! ```
//!
//! Attempts are independent and never retried. The decision is `Granted`
//! exactly when verification succeeded; auditing only echoes the result.
//!
//! [`authenticate_with`] runs the same pipeline but passes the proof and
//! timestamp through a caller hook before the RSU sees them, which is how
//! in-transit tampering is simulated.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use zkotp_core::UnixTimestamp;
use zkotp_zkp::ProofArtifact;

use crate::audit::AuditLog;
use crate::error::ProtocolError;
use crate::ledger::TransactionRef;
use crate::rsu::Rsu;
use crate::vehicle::Vehicle;

/// Random identifier of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Stages an attempt passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStage {
    /// Attempt opened.
    Start,
    /// The vehicle sampled its clock and derived an OTP.
    OtpGenerated,
    /// The vehicle produced a proof.
    ProofCreated,
    /// The RSU returned a verification result.
    Verified,
    /// The result was appended to the audit log.
    Audited,
    /// A decision was reached.
    Decided,
}

/// Access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Verification succeeded.
    Granted,
    /// Verification failed or the vehicle is unknown.
    Denied,
}

impl Decision {
    /// `Granted` iff `verified`.
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    /// Identifier of this attempt.
    pub id: AttemptId,
    /// Stages reached, in order, ending with `Decided`.
    pub stages: Vec<AttemptStage>,
    /// What the RSU returned.
    pub verified: bool,
    /// Ledger reference when the attempt was audited.
    pub transaction: Option<TransactionRef>,
    /// `Granted` iff `verified`.
    pub decision: Decision,
}

/// Run one attempt of `vehicle` against `rsu`, auditing when `audit` is set.
///
/// # Errors
///
/// Any [`ProtocolError`] aborts the attempt; no decision is made.
pub fn authenticate(
    vehicle: &Vehicle,
    rsu: &Rsu,
    audit: Option<&AuditLog>,
) -> Result<AttemptOutcome, ProtocolError> {
    authenticate_with(vehicle, rsu, audit, |proof, timestamp| (proof, timestamp))
}

/// As [`authenticate`], but `in_transit` may replace the proof and timestamp
/// between the vehicle and the RSU. The audit log records what the RSU
/// received.
///
/// # Errors
///
/// Any [`ProtocolError`] aborts the attempt; no decision is made.
pub fn authenticate_with<F>(
    vehicle: &Vehicle,
    rsu: &Rsu,
    audit: Option<&AuditLog>,
    in_transit: F,
) -> Result<AttemptOutcome, ProtocolError>
where
    F: FnOnce(ProofArtifact, UnixTimestamp) -> (ProofArtifact, UnixTimestamp),
{
    let id = AttemptId::new();
    let mut stages = vec![AttemptStage::Start];

    let (otp, timestamp) = vehicle.generate_otp()?;
    stages.push(AttemptStage::OtpGenerated);

    let proof = vehicle.create_proof(&otp, timestamp)?;
    stages.push(AttemptStage::ProofCreated);

    let (proof, timestamp) = in_transit(proof, timestamp);

    let verified = rsu.verify(vehicle.id(), &proof, timestamp)?;
    stages.push(AttemptStage::Verified);

    let transaction = match audit {
        Some(log) => {
            let (_, tx) = log.record_with_ref(vehicle.id(), &proof, timestamp, verified)?;
            stages.push(AttemptStage::Audited);
            Some(tx)
        }
        None => None,
    };

    let decision = Decision::from_verified(verified);
    stages.push(AttemptStage::Decided);
    info!(attempt = %id, %decision, "authentication decided");

    Ok(AttemptOutcome {
        id,
        stages,
        verified,
        transaction,
        decision,
    })
}
