//! # zkotp-zkp: Proof Backends
//!
//! A vehicle proves it knows the OTP for a timestamp; a roadside unit checks
//! that proof against the OTP it re-derives itself. This crate puts that
//! exchange behind one sealed trait so the backend is chosen by
//! configuration, never by branching at call sites.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`ProofBackend`], [`Statement`],
//!   [`ProofArtifact`], and the prove/verify error types.
//! - **Commitment** (`commitment.rs`): [`CommitmentBackend`], the default.
//!   Deterministic `SHA256(hex(otp) ‖ timestamp)` commitments. Transparent,
//!   **no zero-knowledge guarantee**.
//! - **ZoKrates** (`zokrates.rs`, feature `zokrates`): drives an external
//!   ZoKrates-compatible binary through compile, setup, compute-witness,
//!   generate-proof and verify.
//! - **Backend selection** (`backend.rs`): [`ProverConfig`] and
//!   [`build_backend`].
//!
//! ## Failure Policy
//!
//! A proof that does not verify is `Ok(false)`. An `Err` means the backend
//! itself is broken (hash primitive or toolchain failure) and must abort the
//! attempt rather than be read as a bad credential.

pub mod backend;
pub mod commitment;
pub mod traits;
#[cfg(feature = "zokrates")]
pub mod zokrates;

pub use backend::{build_backend, ProverConfig};
pub use commitment::CommitmentBackend;
pub use traits::{ProofArtifact, ProofBackend, ProofError, ProofScheme, Statement, VerifyError};
#[cfg(feature = "zokrates")]
pub use zokrates::{ZokratesBackend, ZokratesConfig};
