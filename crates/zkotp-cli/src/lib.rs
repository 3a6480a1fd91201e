//! # zkotp-cli: Command-Line Front-End
//!
//! Provides the `zkotp` binary.
//!
//! ## Subcommands
//!
//! - `zkotp simulate`: run the scenario suite and report tested/passed.
//! - `zkotp otp`: derive an OTP and its proof for a secret.
//! - `zkotp verify`: act as a one-shot roadside unit for a single vehicle.
//! - `zkotp anonymize`: show the audit form of a vehicle identifier.
//!
//! ```bash
//! zkotp simulate
//! zkotp -v simulate --scenario tampered_proof --json
//! zkotp otp --secret mysecret --timestamp 1700000000
//! zkotp verify --vehicle VEH001 --secret mysecret --timestamp 1700000000 \
//!     --proof 2c3baf2ef57abb0ab44ed0020004bd6a2960f3ecf55031f510d754986aaffdc3
//! ```

pub mod anonymize;
pub mod otp;
pub mod simulate;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use zkotp_protocol::ProtocolConfig;

/// Load the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ProtocolConfig> {
    match path {
        Some(p) => ProtocolConfig::load(p)
            .with_context(|| format!("loading configuration from {}", p.display())),
        None => Ok(ProtocolConfig::default()),
    }
}
