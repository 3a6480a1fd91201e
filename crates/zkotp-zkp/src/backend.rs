//! Backend selection from configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::commitment::CommitmentBackend;
use crate::traits::ProofBackend;
#[cfg(feature = "zokrates")]
use crate::zokrates::{ZokratesBackend, ZokratesConfig};

/// Which proof backend to run, as it appears under `prover:` in the
/// configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ProverConfig {
    /// Hash commitment backend.
    #[default]
    Commitment,
    /// External ZoKrates toolchain.
    #[cfg(feature = "zokrates")]
    Zokrates(ZokratesConfig),
}

/// Construct the configured backend behind a shared handle.
pub fn build_backend(config: &ProverConfig) -> Arc<dyn ProofBackend> {
    match config {
        ProverConfig::Commitment => Arc::new(CommitmentBackend),
        #[cfg(feature = "zokrates")]
        ProverConfig::Zokrates(cfg) => Arc::new(ZokratesBackend::new(cfg.clone())),
    }
}
