//! # zkotp-core: Foundational Types
//!
//! Leaf crate of the zkotp workspace. Every other crate depends on it; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for protocol values.** `VehicleId`, `Secret`, `UnixTimestamp`
//!    and `Digest32` are distinct types. An OTP cannot be passed where a
//!    vehicle identifier is expected.
//!
//! 2. **Secrets never leak through formatting.** `Secret` has a redacted
//!    `Debug`, no `Display`, no `Serialize`, and zeroizes on drop.
//!
//! 3. **Time is injected.** Wall-clock reads go through the [`Clock`] trait
//!    so protocol code is deterministic under test.
//!
//! 4. **One hashing path.** All SHA-256 computation flows through
//!    [`Sha256Accumulator`], which renders lowercase hex.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod secret;
pub mod temporal;

pub use digest::{sha256_hex, Digest32, Sha256Accumulator, DIGEST_HEX_LEN};
pub use error::CoreError;
pub use identity::VehicleId;
pub use secret::Secret;
pub use temporal::{Clock, FixedClock, SystemClock, UnixTimestamp};
