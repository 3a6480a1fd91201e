//! # Simulate Subcommand
//!
//! Runs the handshake scenarios and prints one line per scenario followed
//! by the tested/passed totals, or the whole report as JSON.
//!
//! Exit code 0 when every scenario reached its expected decision, 2
//! otherwise.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use zkotp_core::SystemClock;
use zkotp_protocol::{run_scenarios, ProtocolConfig, RunReport, Scenario};

/// Arguments for `zkotp simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Scenario to run (repeatable). Runs every scenario when omitted.
    #[arg(long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<Scenario>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the simulate subcommand.
pub fn run_simulate(args: &SimulateArgs, config: &ProtocolConfig) -> Result<u8> {
    let scenarios: &[Scenario] = if args.scenarios.is_empty() {
        &Scenario::ALL
    } else {
        &args.scenarios
    };
    let report = run_scenarios(scenarios, config, Arc::new(SystemClock))
        .context("scenario run aborted")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    } else {
        print!("{}", render_report(&report));
    }

    Ok(exit_code(&report))
}

/// 0 when every scenario matched expectation, 2 otherwise.
pub fn exit_code(report: &RunReport) -> u8 {
    if report.all_passed() {
        0
    } else {
        2
    }
}

/// Human-readable report.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    for r in &report.results {
        let status = if r.passed { "PASS" } else { "FAIL" };
        out.push_str(&format!(
            "[{status}] {:<28} expected {:<7} observed {}",
            r.scenario.name(),
            r.expected.as_str(),
            r.observed.as_str()
        ));
        if let Some(tx) = &r.transaction {
            out.push_str(&format!("  tx {tx}"));
        }
        out.push('\n');
    }
    out.push_str(&"-".repeat(72));
    out.push('\n');
    out.push_str(&format!("Total tests run: {}\n", report.tested()));
    out.push_str(&format!("Total tests passed: {}\n", report.passed()));
    out
}
