//! # zkotp CLI entry point
//!
//! Parses command-line arguments, installs logging, loads configuration,
//! and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkotp_cli::anonymize::{run_anonymize, AnonymizeArgs};
use zkotp_cli::load_config;
use zkotp_cli::otp::{run_otp, OtpArgs};
use zkotp_cli::simulate::{run_simulate, SimulateArgs};
use zkotp_cli::verify::{run_verify, VerifyArgs};

/// Time-bound OTP authentication between vehicles and roadside units.
#[derive(Parser, Debug)]
#[command(name = "zkotp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the handshake scenario suite.
    Simulate(SimulateArgs),

    /// Derive an OTP and its proof for a secret.
    Otp(OtpArgs),

    /// Verify a proof as a single-vehicle roadside unit.
    Verify(VerifyArgs),

    /// Show the anonymized form of a vehicle identifier.
    Anonymize(AnonymizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "zkotp CLI starting");

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::Simulate(args) => run_simulate(args, &config),
        Commands::Otp(args) => run_otp(args, &config),
        Commands::Verify(args) => run_verify(args, &config),
        Commands::Anonymize(args) => run_anonymize(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
