//! # Commitment Proof Engine
//!
//! ```text
//! proof = SHA256( hex(otp) || ascii_decimal(timestamp) )
//! ```
//!
//! The same function produces the vehicle's proof and the roadside unit's
//! expected value. It is pure; the caller guarantees that `timestamp` is the
//! one the OTP was derived with. A mismatched timestamp is not detected here
//! and simply yields a proof that fails verification.

use serde::{Deserialize, Serialize};
use zkotp_core::{CoreError, Digest32, Sha256Accumulator, UnixTimestamp};

use crate::compare::digests_match;
use crate::otp::Otp;

/// A hash commitment to an OTP and its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(Digest32);

impl Commitment {
    /// Wrap a digest.
    pub const fn from_digest(digest: Digest32) -> Self {
        Self(digest)
    }

    /// Parse the 64-char lowercase hex wire form.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] for wrong length or non-hex input.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Digest32::from_hex(s).map(Self)
    }

    /// The underlying digest.
    pub fn digest(&self) -> &Digest32 {
        &self.0
    }

    /// Lowercase hex wire form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Constant-time equality.
    pub fn matches(&self, other: &Commitment) -> bool {
        digests_match(&self.0, &other.0)
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Commit to an OTP at a timestamp.
pub fn create_proof(otp: &Otp, timestamp: UnixTimestamp) -> Commitment {
    let mut acc = Sha256Accumulator::new();
    acc.update(otp.to_hex()).update(timestamp.to_decimal());
    Commitment(acc.finalize())
}
