//! # One-Time Password Generation
//!
//! ```text
//! otp = SHA256( secret_bytes || ascii_decimal(timestamp) )
//! ```
//!
//! The OTP is deterministic in `(secret, timestamp)`. The vehicle samples the
//! timestamp once and must carry it alongside the proof; the roadside unit
//! re-derives the OTP from its registry copy of the secret and the
//! timestamp it was given.

use serde::{Deserialize, Serialize};
use zkotp_core::{Clock, CoreError, Digest32, Secret, Sha256Accumulator, UnixTimestamp};

/// A derived one-time password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Otp(Digest32);

impl Otp {
    /// Wrap a digest as an OTP.
    pub const fn from_digest(digest: Digest32) -> Self {
        Self(digest)
    }

    /// The underlying digest.
    pub fn digest(&self) -> &Digest32 {
        &self.0
    }

    /// Lowercase hex form, which is what the proof hashes.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl std::fmt::Display for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Derive the OTP for a secret at a given timestamp.
pub fn derive_otp(secret: &Secret, timestamp: UnixTimestamp) -> Otp {
    let mut acc = Sha256Accumulator::new();
    acc.update(secret.expose()).update(timestamp.to_decimal());
    Otp(acc.finalize())
}

/// Sample the clock and derive the OTP for that instant.
///
/// The returned timestamp must be reused for proof creation and sent to the
/// verifier; a later clock reading would yield a different OTP.
///
/// # Errors
///
/// Propagates [`CoreError::ClockBeforeEpoch`] from the clock.
pub fn generate_otp(secret: &Secret, clock: &dyn Clock) -> Result<(Otp, UnixTimestamp), CoreError> {
    let timestamp = clock.now()?;
    Ok((derive_otp(secret, timestamp), timestamp))
}
