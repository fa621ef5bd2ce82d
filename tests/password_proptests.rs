//! Property-based tests for password hashing.

use credseal::{Argon2Params, PasswordError, hash_password_with, verify_password};
use proptest::prelude::*;

/// Small params for fast property tests.
fn fast() -> Argon2Params {
    Argon2Params::new(32, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every password verifies against its own hash.
    #[test]
    fn hash_then_verify(password in proptest::collection::vec(any::<u8>(), 0..128)) {
        let encoded = hash_password_with(&password, &fast()).unwrap();
        prop_assert!(verify_password(&password, &encoded).unwrap());
    }

    /// A different password never verifies.
    #[test]
    fn other_password_is_rejected(
        password in proptest::collection::vec(any::<u8>(), 0..64),
        other in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(password != other);
        let encoded = hash_password_with(&password, &fast()).unwrap();
        prop_assert!(!verify_password(&other, &encoded).unwrap());
    }

    /// Records always split into six fields.
    #[test]
    fn six_fields(password in "\\PC{0,40}") {
        let encoded = hash_password_with(password.as_bytes(), &fast()).unwrap();
        prop_assert_eq!(encoded.split('$').count(), 6);
    }

    /// Arbitrary text never panics the parser; anything not shaped like a
    /// record is a format error rather than `false`.
    #[test]
    fn arbitrary_text_is_a_format_error(text in "[^$]{0,64}(\\$[^$]{0,16}){0,4}") {
        prop_assert!(matches!(
            verify_password(b"pw", &text),
            Err(PasswordError::InvalidFormat(_))
        ));
    }
}
