//! # SHA-256 Digests
//!
//! `Digest32` is the 32-byte output of every hash in the protocol: OTPs,
//! commitment proofs, identity hashes, and audit-chain links. It renders as
//! 64 lowercase hex characters, which is also the form that feeds the next
//! hash in the chain (the proof hashes the OTP's hex text, not its bytes).
//!
//! [`Sha256Accumulator`] is the single incremental hashing path.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Length of a digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest32([u8; 32]);

impl Digest32 {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The all-zero digest, used as the genesis link of hash chains.
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 chars).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse the canonical 64-character lowercase hex form.
    ///
    /// Upper-case digits are rejected; each digest has exactly one accepted
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHexLength`] or [`CoreError::InvalidHexChar`].
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(CoreError::InvalidHexLength {
                expected: DIGEST_HEX_LEN,
                got: s.len(),
            });
        }
        let raw = s.as_bytes();
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            let hi = hex_val(raw[2 * i]).ok_or(CoreError::InvalidHexChar(2 * i))?;
            let lo = hex_val(raw[2 * i + 1]).ok_or(CoreError::InvalidHexChar(2 * i + 1))?;
            *byte = (hi << 4) | lo;
        }
        Ok(Self(out))
    }

    /// Split into two big-endian 128-bit limbs `(high, low)`.
    ///
    /// Arithmetic circuits cannot hold a full 256-bit value in one field
    /// element, so external provers receive digests in this form.
    pub fn to_u128_limbs(&self) -> (u128, u128) {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&self.0[..16]);
        lo.copy_from_slice(&self.0[16..]);
        (u128::from_be_bytes(hi), u128::from_be_bytes(lo))
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

impl std::fmt::Debug for Digest32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest32({})", self.to_hex())
    }
}

impl std::fmt::Display for Digest32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 hasher.
#[derive(Debug, Clone, Default)]
pub struct Sha256Accumulator {
    inner: Sha256,
}

impl Sha256Accumulator {
    /// Start a new hash.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Feed bytes.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.inner.update(data.as_ref());
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> Digest32 {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.finalize());
        Digest32(out)
    }

    /// Finish and return the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        self.finalize().to_hex()
    }
}

/// One-shot SHA-256 of `data`, as lowercase hex.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    let mut acc = Sha256Accumulator::new();
    acc.update(data);
    acc.finalize_hex()
}
