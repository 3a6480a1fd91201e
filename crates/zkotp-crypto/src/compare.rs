//! Constant-time digest comparison.

use subtle::ConstantTimeEq;
use zkotp_core::Digest32;

/// Compare two digests without an early exit on the first differing byte.
pub fn digests_match(a: &Digest32, b: &Digest32) -> bool {
    bool::from(a.as_bytes()[..].ct_eq(&b.as_bytes()[..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_digests_match() {
        let d = Digest32::from_bytes([7u8; 32]);
        assert!(digests_match(&d, &d));
    }

    #[test]
    fn last_byte_difference_detected() {
        let a = Digest32::from_bytes([7u8; 32]);
        let mut raw = [7u8; 32];
        raw[31] = 8;
        assert!(!digests_match(&a, &Digest32::from_bytes(raw)));
    }
}
