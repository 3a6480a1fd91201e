//! # zkotp-protocol: Vehicle/RSU Authentication
//!
//! The handshake between a vehicle and a roadside unit (RSU):
//!
//! ```text
//! Vehicle::generate_otp ─▶ Vehicle::create_proof ─▶ Rsu::verify
//!     ─▶ [AuditLog::record] ─▶ Decision
//! ```
//!
//! ## Modules
//!
//! - [`vehicle`]: the prover. Holds an id, a secret, a backend and a clock.
//! - [`registry`] and [`rsu`]: the verifier and its secret table, with an
//!   optional freshness window.
//! - [`audit`] and [`ledger`]: anonymized, hash-chained audit records.
//! - [`attempt`]: one pass through the handshake as a staged state machine.
//! - [`scenario`]: canned handshakes and their expected decisions.
//! - [`config`]: YAML configuration tying the pieces together.
//!
//! ## Failure Policy
//!
//! A rejected vehicle is `Ok(false)` / [`Decision::Denied`]. [`ProtocolError`]
//! means the machinery failed (clock, prover backend, ledger) and no
//! decision was made.

pub mod attempt;
pub mod audit;
pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod rsu;
pub mod scenario;
pub mod vehicle;

pub use attempt::{authenticate, authenticate_with, AttemptId, AttemptOutcome, AttemptStage, Decision};
pub use audit::{AuditLog, PROOF_FINGERPRINT_LEN};
pub use config::{AuditConfig, ProtocolConfig};
pub use error::{AuditError, ConfigError, LedgerError, ProtocolError};
pub use ledger::{AuditRecord, InMemoryLedger, Ledger, LedgerEvent, TransactionRef};
pub use registry::Registry;
pub use rsu::{FreshnessPolicy, Rsu};
pub use scenario::{run_scenarios, RunReport, Scenario, ScenarioResult, UnknownScenario};
pub use vehicle::Vehicle;
