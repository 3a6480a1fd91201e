//! # Scenario Runner
//!
//! Canned end-to-end handshakes, each with the decision it should reach.
//! A run returns a [`RunReport`] instead of mutating shared counters, so
//! runs are independent and can execute side by side.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use zkotp_core::{Clock, Secret, UnixTimestamp, VehicleId};
use zkotp_zkp::{ProofArtifact, ProofBackend};

use crate::attempt::{authenticate, authenticate_with, AttemptOutcome, Decision};
use crate::audit::AuditLog;
use crate::config::ProtocolConfig;
use crate::error::ProtocolError;
use crate::ledger::{AuditRecord, InMemoryLedger, TransactionRef};
use crate::registry::Registry;
use crate::rsu::Rsu;
use crate::vehicle::Vehicle;

const ENROLLED_ID: &str = "VEH001";
const HANDSHAKE_ID: &str = "VEH123";
const UNKNOWN_ID: &str = "VEH999";

/// Name did not match any scenario.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario `{0}`")]
pub struct UnknownScenario(pub String);

/// A canned handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Fresh random secret shared by vehicle and RSU, no audit.
    SimulatedHandshake,
    /// As above, recorded in the audit log.
    SimulatedHandshakeAudited,
    /// Vehicle and RSU hold different secrets for the same id.
    FailedAuthentication,
    /// Vehicle id absent from the registry.
    UnknownVehicle,
    /// Valid proof with one hex digit changed in transit.
    TamperedProof,
    /// Valid proof presented with the next second's timestamp.
    TimestampMismatch,
}

impl Scenario {
    /// Every scenario, in run order.
    pub const ALL: [Scenario; 6] = [
        Scenario::SimulatedHandshake,
        Scenario::SimulatedHandshakeAudited,
        Scenario::FailedAuthentication,
        Scenario::UnknownVehicle,
        Scenario::TamperedProof,
        Scenario::TimestampMismatch,
    ];

    /// Stable snake_case name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimulatedHandshake => "simulated_handshake",
            Self::SimulatedHandshakeAudited => "simulated_handshake_audited",
            Self::FailedAuthentication => "failed_authentication",
            Self::UnknownVehicle => "unknown_vehicle",
            Self::TamperedProof => "tampered_proof",
            Self::TimestampMismatch => "timestamp_mismatch",
        }
    }

    /// The decision a correct implementation reaches.
    pub fn expected(&self) -> Decision {
        match self {
            Self::SimulatedHandshake | Self::SimulatedHandshakeAudited => Decision::Granted,
            _ => Decision::Denied,
        }
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Which scenario ran.
    pub scenario: Scenario,
    /// Decision the scenario should reach.
    pub expected: Decision,
    /// Decision it reached.
    pub observed: Decision,
    /// What the RSU returned.
    pub verified: bool,
    /// Ledger reference when the scenario was audited.
    pub transaction: Option<TransactionRef>,
    /// `observed == expected`.
    pub passed: bool,
}

/// Results of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per scenario.
    pub results: Vec<ScenarioResult>,
    /// Records the run appended to its audit ledger.
    pub audit_records: Vec<AuditRecord>,
}

impl RunReport {
    /// Number of scenarios run.
    pub fn tested(&self) -> usize {
        self.results.len()
    }

    /// Number of scenarios whose decision matched expectation.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Whether every scenario matched expectation.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

/// Shared collaborators for one run.
struct Harness<'a> {
    config: &'a ProtocolConfig,
    backend: Arc<dyn ProofBackend>,
    clock: Arc<dyn Clock>,
    audit: AuditLog,
}

impl Harness<'_> {
    fn vehicle(&self, id: &str, secret: Secret) -> Vehicle {
        Vehicle::with_parts(id, secret, Arc::clone(&self.backend), Arc::clone(&self.clock))
    }

    fn rsu(&self, id: &str, secret: Secret) -> Rsu {
        let registry: Registry = [(VehicleId::from(id), secret)].into_iter().collect();
        self.config
            .build_rsu(registry, Arc::clone(&self.backend), Arc::clone(&self.clock))
    }

    fn audit_if_enabled(&self) -> Option<&AuditLog> {
        self.config.audit.enabled.then_some(&self.audit)
    }

    fn run(&self, scenario: Scenario) -> Result<ScenarioResult, ProtocolError> {
        let outcome = match scenario {
            Scenario::SimulatedHandshake => {
                let secret = Secret::generate()?;
                let vehicle = self.vehicle(HANDSHAKE_ID, secret.clone());
                let rsu = self.rsu(HANDSHAKE_ID, secret);
                authenticate(&vehicle, &rsu, None)?
            }
            Scenario::SimulatedHandshakeAudited => {
                let secret = Secret::generate()?;
                let vehicle = self.vehicle(HANDSHAKE_ID, secret.clone());
                let rsu = self.rsu(HANDSHAKE_ID, secret);
                authenticate(&vehicle, &rsu, Some(&self.audit))?
            }
            Scenario::FailedAuthentication => {
                let vehicle = self.vehicle(ENROLLED_ID, Secret::generate()?);
                let rsu = self.rsu(ENROLLED_ID, Secret::generate()?);
                authenticate(&vehicle, &rsu, self.audit_if_enabled())?
            }
            Scenario::UnknownVehicle => {
                let secret = Secret::generate()?;
                let vehicle = self.vehicle(UNKNOWN_ID, secret.clone());
                let rsu = self.rsu(ENROLLED_ID, secret);
                authenticate(&vehicle, &rsu, self.audit_if_enabled())?
            }
            Scenario::TamperedProof => self.altered(|proof, ts| (tamper(proof), ts))?,
            Scenario::TimestampMismatch => self.altered(|proof, ts| {
                (proof, UnixTimestamp::from_secs(ts.as_secs().saturating_add(1)))
            })?,
        };
        let expected = scenario.expected();
        let passed = outcome.decision == expected;
        info!(scenario = %scenario, %expected, observed = %outcome.decision, passed, "scenario finished");
        Ok(ScenarioResult {
            scenario,
            expected,
            observed: outcome.decision,
            verified: outcome.verified,
            transaction: outcome.transaction,
            passed,
        })
    }

    /// Enrolled vehicle whose proof or timestamp is changed in transit.
    fn altered(
        &self,
        in_transit: impl FnOnce(ProofArtifact, UnixTimestamp) -> (ProofArtifact, UnixTimestamp),
    ) -> Result<AttemptOutcome, ProtocolError> {
        let secret = Secret::generate()?;
        let vehicle = self.vehicle(ENROLLED_ID, secret.clone());
        let rsu = self.rsu(ENROLLED_ID, secret);
        authenticate_with(&vehicle, &rsu, self.audit_if_enabled(), in_transit)
    }
}

/// Change the last hex digit of the payload.
fn tamper(mut proof: ProofArtifact) -> ProofArtifact {
    if let Some((idx, c)) = proof
        .payload
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_hexdigit())
    {
        let replacement = if c == '0' { "1" } else { "0" };
        proof.payload.replace_range(idx..idx + 1, replacement);
    } else {
        proof.payload.push('0');
    }
    proof
}

/// Run `scenarios` in order with the collaborators `config` selects.
///
/// Every run gets its own in-memory ledger; the records it appended are
/// returned in the report.
///
/// # Errors
///
/// The first infrastructure failure aborts the run.
pub fn run_scenarios(
    scenarios: &[Scenario],
    config: &ProtocolConfig,
    clock: Arc<dyn Clock>,
) -> Result<RunReport, ProtocolError> {
    let ledger = Arc::new(InMemoryLedger::new());
    let harness = Harness {
        config,
        backend: config.backend(),
        clock,
        audit: AuditLog::with_prefix_len(ledger.clone(), config.audit.anonymized_prefix_len),
    };

    let mut report = RunReport::default();
    for &scenario in scenarios {
        report.results.push(harness.run(scenario)?);
    }
    report.audit_records = ledger.records();
    Ok(report)
}
