//! # Vehicle Secret
//!
//! The shared secret known to a vehicle and to the registry of the roadside
//! unit that authenticates it. It is hashed into every OTP and never leaves
//! either party.
//!
//! ## Security Invariant
//!
//! `Secret` cannot be printed, serialized, or compared in variable time by
//! accident: `Debug` is redacted, there is no `Display`/`Serialize`, and the
//! bytes are zeroized when the value is dropped.

use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CoreError;

/// Number of random bytes in a generated secret.
pub const GENERATED_SECRET_BYTES: usize = 16;

/// Opaque, non-empty secret byte string.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySecret`] for an empty input.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::EmptySecret);
        }
        Ok(Self(bytes))
    }

    /// Generate a fresh random secret.
    ///
    /// The secret is the lowercase hex rendering of
    /// [`GENERATED_SECRET_BYTES`] bytes from the OS random source, so its
    /// hashed form is a 32-character ASCII string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Random`] if the OS random source fails.
    pub fn generate() -> Result<Self, CoreError> {
        let mut raw = [0u8; GENERATED_SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|e| CoreError::Random(e.to_string()))?;
        let text: String = raw.iter().map(|b| format!("{b:02x}")).collect();
        raw.zeroize();
        Ok(Self(text.into_bytes()))
    }

    /// Expose the secret bytes for hashing.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Number of secret bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED; {} bytes])", self.0.len())
    }
}

impl TryFrom<&str> for Secret {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes())
    }
}
