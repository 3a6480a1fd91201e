//! # Protocol Configuration
//!
//! YAML configuration for the prover backend, the freshness window, and
//! the audit log. Every field has a default, so an empty document is a
//! valid configuration that reproduces the unconfigured behavior.
//!
//! ```yaml
//! prover:
//!   backend: commitment
//! freshness:
//!   max_age_secs: 30
//!   max_future_skew_secs: 5
//! audit:
//!   enabled: true
//!   anonymized_prefix_len: 10
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zkotp_core::{Clock, DIGEST_HEX_LEN};
use zkotp_crypto::DEFAULT_ANONYMIZED_PREFIX_LEN;
use zkotp_zkp::{build_backend, ProofBackend, ProverConfig};

use crate::audit::AuditLog;
use crate::error::ConfigError;
use crate::ledger::Ledger;
use crate::registry::Registry;
use crate::rsu::{FreshnessPolicy, Rsu};

/// Audit log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether attempts are recorded.
    pub enabled: bool,
    /// Hex length of the anonymized identifier, `1..=64`.
    pub anonymized_prefix_len: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anonymized_prefix_len: DEFAULT_ANONYMIZED_PREFIX_LEN,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Proof backend selection.
    pub prover: ProverConfig,
    /// Freshness window; `None` accepts any timestamp.
    pub freshness: Option<FreshnessPolicy>,
    /// Audit log switch and identifier prefix length.
    pub audit: AuditConfig,
}

impl ProtocolConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] in addition to the errors of
    /// [`ProtocolConfig::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.audit.anonymized_prefix_len;
        if !(1..=DIGEST_HEX_LEN).contains(&len) {
            return Err(ConfigError::Invalid {
                field: "audit.anonymized_prefix_len",
                reason: format!("{len} is outside 1..={DIGEST_HEX_LEN}"),
            });
        }
        validate_prover(&self.prover)
    }

    /// The configured proof backend.
    pub fn backend(&self) -> Arc<dyn ProofBackend> {
        build_backend(&self.prover)
    }

    /// An RSU over `registry` using `backend`, with the configured
    /// freshness window measured against `clock`.
    pub fn build_rsu(
        &self,
        registry: Registry,
        backend: Arc<dyn ProofBackend>,
        clock: Arc<dyn Clock>,
    ) -> Rsu {
        let rsu = Rsu::with_backend(registry, backend);
        match self.freshness {
            Some(policy) => rsu.with_freshness(policy, clock),
            None => rsu,
        }
    }

    /// An audit log over `ledger`, or `None` when auditing is disabled.
    pub fn build_audit_log(&self, ledger: Arc<dyn Ledger>) -> Option<AuditLog> {
        self.audit
            .enabled
            .then(|| AuditLog::with_prefix_len(ledger, self.audit.anonymized_prefix_len))
    }
}

#[cfg(feature = "zokrates")]
fn validate_prover(prover: &ProverConfig) -> Result<(), ConfigError> {
    if let ProverConfig::Zokrates(z) = prover {
        if z.binary.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "prover.binary",
                reason: "must not be empty".to_string(),
            });
        }
        if z.circuit.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "prover.circuit",
                reason: "must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(not(feature = "zokrates"))]
fn validate_prover(_prover: &ProverConfig) -> Result<(), ConfigError> {
    Ok(())
}
