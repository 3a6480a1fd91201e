//! # ZoKrates Toolchain Backend
//!
//! Drives an external ZoKrates-compatible binary as a subprocess. The
//! circuit is an external collaborator; this backend only fixes how
//! statements are encoded for it:
//!
//! ```text
//! compute-witness -a <otp_hi> <otp_lo> <commit_hi> <commit_lo> <timestamp>
//! public inputs   = [commit_hi, commit_lo, timestamp]
//! ```
//!
//! where `commit = SHA256(hex(otp) ‖ timestamp)` and every 256-bit digest is
//! split into two big-endian 128-bit limbs rendered in decimal.
//!
//! ## Pipeline
//!
//! `compile -i <circuit>` and `setup` run once per backend instance. Each
//! proof then runs `compute-witness` and `generate-proof` and returns the
//! contents of `proof.json`. Verification checks the proof's declared
//! public inputs against the verifier's statement, stages the document as
//! `proof.json`, and runs `verify`.
//!
//! All steps share one working directory, so the whole pipeline runs under
//! a mutex.

use std::path::{Path, PathBuf};
use std::process::Command;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zkotp_crypto::create_proof;

use crate::traits::{ProofArtifact, ProofBackend, ProofError, ProofScheme, Statement, VerifyError};

const PROOF_FILE: &str = "proof.json";

/// Location of the ZoKrates binary, circuit, and working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZokratesConfig {
    /// Binary name (resolved via `PATH`) or path.
    pub binary: PathBuf,
    /// Circuit source passed to `compile -i`.
    pub circuit: PathBuf,
    /// Directory holding compiled circuit, keys, witness, and proof.
    pub work_dir: PathBuf,
}

impl Default for ZokratesConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("zokrates"),
            circuit: PathBuf::from("circuits/otp.zok"),
            work_dir: PathBuf::from("target/zokrates"),
        }
    }
}

/// Failure of a single toolchain step.
#[derive(Debug)]
struct StepFailure {
    step: &'static str,
    detail: String,
}

impl From<StepFailure> for ProofError {
    fn from(f: StepFailure) -> Self {
        ProofError::Toolchain {
            step: f.step.to_string(),
            detail: f.detail,
        }
    }
}

impl From<StepFailure> for VerifyError {
    fn from(f: StepFailure) -> Self {
        VerifyError::Toolchain {
            step: f.step.to_string(),
            detail: f.detail,
        }
    }
}

/// Output of a toolchain step that was spawned successfully.
struct StepOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// External toolchain proof backend.
#[derive(Debug)]
pub struct ZokratesBackend {
    config: ZokratesConfig,
    /// Whether `compile` and `setup` have run. Guards the shared work dir.
    prepared: Mutex<bool>,
}

impl ZokratesBackend {
    /// Backend over the given toolchain configuration. Nothing runs until
    /// the first `prove` or `verify`.
    pub fn new(config: ZokratesConfig) -> Self {
        Self {
            config,
            prepared: Mutex::new(false),
        }
    }

    /// The toolchain configuration.
    pub fn config(&self) -> &ZokratesConfig {
        &self.config
    }

    fn run(&self, step: &'static str, args: &[String]) -> Result<StepOutput, StepFailure> {
        let binary = absolutize_if_path(&self.config.binary).map_err(|e| StepFailure {
            step,
            detail: e.to_string(),
        })?;
        debug!(step, binary = %binary.display(), ?args, "running proof toolchain step");
        let output = Command::new(&binary)
            .arg(step)
            .args(args)
            .current_dir(&self.config.work_dir)
            .output()
            .map_err(|e| StepFailure {
                step,
                detail: format!("failed to spawn {}: {e}", binary.display()),
            })?;
        Ok(StepOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run a step that must exit successfully.
    fn run_checked(&self, step: &'static str, args: &[String]) -> Result<String, StepFailure> {
        let out = self.run(step, args)?;
        if !out.success {
            return Err(StepFailure {
                step,
                detail: out.stderr.trim().to_string(),
            });
        }
        Ok(out.stdout)
    }

    /// Compile the circuit and generate keys, once. Caller holds the lock.
    fn ensure_prepared(&self, prepared: &mut bool) -> Result<(), ProofError> {
        if *prepared {
            return Ok(());
        }
        std::fs::create_dir_all(&self.config.work_dir)?;
        let circuit = absolutize(&self.config.circuit)?;
        self.run_checked("compile", &["-i".to_string(), circuit.display().to_string()])?;
        self.run_checked("setup", &[])?;
        *prepared = true;
        info!(work_dir = %self.config.work_dir.display(), "proof toolchain prepared");
        Ok(())
    }
}

impl ProofBackend for ZokratesBackend {
    fn scheme(&self) -> ProofScheme {
        ProofScheme::Zokrates
    }

    fn prove(&self, statement: &Statement) -> Result<ProofArtifact, ProofError> {
        let mut prepared = self.prepared.lock();
        self.ensure_prepared(&mut prepared)?;

        let (otp_hi, otp_lo) = statement.otp.digest().to_u128_limbs();
        let commitment = create_proof(&statement.otp, statement.timestamp);
        let (commit_hi, commit_lo) = commitment.digest().to_u128_limbs();
        let witness_args = vec![
            "-a".to_string(),
            otp_hi.to_string(),
            otp_lo.to_string(),
            commit_hi.to_string(),
            commit_lo.to_string(),
            statement.timestamp.to_decimal(),
        ];
        self.run_checked("compute-witness", &witness_args)?;
        self.run_checked("generate-proof", &[])?;

        let payload = std::fs::read_to_string(self.config.work_dir.join(PROOF_FILE))?;
        serde_json::from_str::<serde_json::Value>(&payload).map_err(|e| ProofError::Toolchain {
            step: "generate-proof".to_string(),
            detail: format!("{PROOF_FILE} is not valid JSON: {e}"),
        })?;
        Ok(ProofArtifact::new(ProofScheme::Zokrates, payload))
    }

    fn verify(&self, proof: &ProofArtifact, statement: &Statement) -> Result<bool, VerifyError> {
        if proof.scheme != ProofScheme::Zokrates {
            debug!(scheme = %proof.scheme, "toolchain backend rejects foreign proof scheme");
            return Ok(false);
        }
        let Some(declared) = declared_inputs(&proof.payload) else {
            debug!("proof document has no parseable public inputs");
            return Ok(false);
        };
        if declared != statement.public_inputs() {
            debug!("proof public inputs do not match the reconstructed statement");
            return Ok(false);
        }

        let mut prepared = self.prepared.lock();
        self.ensure_prepared(&mut prepared).map_err(|e| match e {
            ProofError::Io(io) => VerifyError::Io(io),
            ProofError::HashingFailure(d) => VerifyError::HashingFailure(d),
            ProofError::Toolchain { step, detail } => VerifyError::Toolchain { step, detail },
        })?;
        std::fs::write(self.config.work_dir.join(PROOF_FILE), &proof.payload)?;

        let out = self.run("verify", &[])?;
        if !out.success {
            warn!(stderr = %out.stderr.trim(), "proof toolchain rejected the proof");
            return Ok(false);
        }
        Ok(out.stdout.contains("PASSED") || out.stdout.contains("Proof is valid"))
    }
}

/// Public inputs declared in a proof document's `inputs` array.
fn declared_inputs(payload: &str) -> Option<[u128; 3]> {
    let doc: serde_json::Value = serde_json::from_str(payload).ok()?;
    let inputs = doc.get("inputs")?.as_array()?;
    if inputs.len() != 3 {
        return None;
    }
    let mut out = [0u128; 3];
    for (slot, value) in out.iter_mut().zip(inputs) {
        *slot = parse_field_element(value.as_str()?)?;
    }
    Some(out)
}

/// Parse a field element written as decimal or `0x`-prefixed hex.
/// Values wider than 128 bits are rejected.
fn parse_field_element(s: &str) -> Option<u128> {
    match s.strip_prefix("0x") {
        Some(hex) => {
            let significant = hex.trim_start_matches('0');
            if significant.is_empty() {
                return if hex.is_empty() { None } else { Some(0) };
            }
            if significant.len() > 32 {
                return None;
            }
            u128::from_str_radix(significant, 16).ok()
        }
        None => s.parse().ok(),
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Bare binary names stay as-is for `PATH` lookup; relative paths are
/// resolved against the current directory because steps run in `work_dir`.
fn absolutize_if_path(binary: &Path) -> std::io::Result<PathBuf> {
    if binary.components().count() > 1 {
        absolutize(binary)
    } else {
        Ok(binary.to_path_buf())
    }
}
