//! # zkotp-crypto: Protocol Primitives
//!
//! The hash constructions shared by vehicles and roadside units:
//!
//! - **OTP**: `SHA256(secret ‖ decimal(timestamp))`.
//! - **Commitment proof**: `SHA256(hex(otp) ‖ decimal(timestamp))`, the
//!   hash-based stand-in for a zero-knowledge proof. It shows knowledge of
//!   the OTP without sending it, but offers only preimage resistance, not
//!   zero-knowledge soundness.
//! - **Anonymization**: `SHA256(vehicle_id)` with a short display prefix.
//! - **Constant-time comparison** of digests.
//!
//! Both call sites of each construction (the prover and the verifier's
//! recomputation) use the same function from this crate, so the two sides
//! cannot drift apart.

pub mod anonymize;
pub mod commitment;
pub mod compare;
pub mod otp;

pub use anonymize::{anonymize, fingerprint, AnonymizedIdentity, DEFAULT_ANONYMIZED_PREFIX_LEN};
pub use commitment::{create_proof, Commitment};
pub use compare::digests_match;
pub use otp::{derive_otp, generate_otp, Otp};
