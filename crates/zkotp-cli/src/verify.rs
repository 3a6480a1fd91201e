//! # Verify Subcommand
//!
//! Acts as a roadside unit whose registry holds a single vehicle, checks
//! one proof, and records the attempt unless auditing is off.
//!
//! Prints `granted` or `denied`. Exit code 0 when granted, 2 when denied.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use zkotp_core::{Secret, SystemClock, UnixTimestamp, VehicleId};
use zkotp_protocol::{Decision, InMemoryLedger, ProtocolConfig, Registry};
use zkotp_zkp::ProofArtifact;

/// Arguments for `zkotp verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Vehicle identifier presented with the proof.
    #[arg(long)]
    pub vehicle: String,

    /// Secret the roadside unit holds for the vehicle.
    #[arg(long)]
    pub secret: String,

    /// Proof payload as produced by `zkotp otp`.
    #[arg(long)]
    pub proof: String,

    /// Unix timestamp the proof was created at.
    #[arg(long)]
    pub timestamp: u64,

    /// Skip the audit log even when configuration enables it.
    #[arg(long)]
    pub no_audit: bool,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, config: &ProtocolConfig) -> Result<u8> {
    let (decision, rendered) = verify_and_render(args, config)?;
    print!("{rendered}");
    Ok(match decision {
        Decision::Granted => 0,
        Decision::Denied => 2,
    })
}

/// Verify the proof and render the decision.
pub fn verify_and_render(args: &VerifyArgs, config: &ProtocolConfig) -> Result<(Decision, String)> {
    let id = VehicleId::from(args.vehicle.as_str());
    let secret = Secret::try_from(args.secret.as_str()).context("invalid --secret")?;
    let registry: Registry = [(id.clone(), secret)].into_iter().collect();

    let backend = config.backend();
    let scheme = backend.scheme();
    let rsu = config.build_rsu(registry, backend, Arc::new(SystemClock));
    let proof = ProofArtifact::new(scheme, args.proof.trim());
    let timestamp = UnixTimestamp::from_secs(args.timestamp);

    let verified = rsu
        .verify(&id, &proof, timestamp)
        .context("verification could not run")?;
    let decision = Decision::from_verified(verified);

    let mut out = format!("{decision}\n");
    if !args.no_audit {
        if let Some(log) = config.build_audit_log(Arc::new(InMemoryLedger::new())) {
            let (_, tx) = log
                .record_with_ref(&id, &proof, timestamp, verified)
                .context("audit log rejected the attempt")?;
            out.push_str(&format!("tx: {tx}\n"));
        }
    }
    Ok((decision, out))
}
