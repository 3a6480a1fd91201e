//! # OTP Subcommand
//!
//! Derives the OTP for a secret and produces the proof a vehicle would
//! send, using the configured prover backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use zkotp_core::{Clock, FixedClock, Secret, SystemClock};
use zkotp_protocol::{ProtocolConfig, Vehicle};

/// Arguments for `zkotp otp`.
#[derive(Args, Debug)]
pub struct OtpArgs {
    /// Shared secret.
    #[arg(long)]
    pub secret: String,

    /// Unix timestamp in seconds. Defaults to the current time.
    #[arg(long)]
    pub timestamp: Option<u64>,
}

/// Execute the otp subcommand.
pub fn run_otp(args: &OtpArgs, config: &ProtocolConfig) -> Result<u8> {
    print!("{}", render_otp(args, config)?);
    Ok(0)
}

/// Derive and render the OTP, timestamp, and proof.
pub fn render_otp(args: &OtpArgs, config: &ProtocolConfig) -> Result<String> {
    let secret = Secret::try_from(args.secret.as_str()).context("invalid --secret")?;
    let clock: Arc<dyn Clock> = match args.timestamp {
        Some(t) => Arc::new(FixedClock::new(t)),
        None => Arc::new(SystemClock),
    };
    let vehicle = Vehicle::with_parts("cli", secret, config.backend(), clock);

    let (otp, timestamp) = vehicle.generate_otp()?;
    let proof = vehicle
        .create_proof(&otp, timestamp)
        .context("proof generation failed")?;

    let iso = timestamp.to_iso8601().unwrap_or_else(|| "-".to_string());
    Ok(format!(
        "otp:       {otp}\ntimestamp: {timestamp} ({iso})\nscheme:    {}\nproof:     {}\n",
        proof.scheme, proof.payload
    ))
}
