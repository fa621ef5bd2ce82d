//! Constant-time equality for secret-derived bytes.
//!
//! Password hashes and cookie signatures are compared through this module
//! only. Comparing them with `==` leaks, through timing, how many leading
//! bytes matched.

use subtle::ConstantTimeEq;

/// Equality whose running time does not depend on where the inputs differ.
pub trait ConstantTimeEquals {
    fn constant_time_equals(&self, other: &Self) -> bool;
}

impl ConstantTimeEquals for [u8] {
    fn constant_time_equals(&self, other: &[u8]) -> bool {
        // lengths are public (fixed digest/hash sizes)
        if self.len() != other.len() {
            return false;
        }
        self.ct_eq(other).into()
    }
}

/// Shorthand for [`ConstantTimeEquals`] on byte slices.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.constant_time_equals(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_slices_match() {
        assert!(constant_time_eq(b"same bytes", b"same bytes"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn late_difference_is_detected() {
        let a = [0u8; 32];
        let mut b = [0u8; 32];
        b[31] = 1;
        assert!(!constant_time_eq(&a, &b));
    }

    #[test]
    fn length_mismatch_is_false() {
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2]));
        assert!(!constant_time_eq(&[], &[0]));
    }

    #[test]
    fn trait_works_on_arrays_through_slices() {
        let a = [7u8; 16];
        let b = [7u8; 16];
        assert!(a[..].constant_time_equals(&b[..]));
    }
}
