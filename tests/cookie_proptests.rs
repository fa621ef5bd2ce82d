//! Property-based tests for signed cookies.

use base64::{Engine, engine::general_purpose::URL_SAFE};
use credseal::{CookieError, read_signed, sign_value};
use credseal::cookie::DIGEST_LEN;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,24}"
}

proptest! {
    /// Whatever was written reads back unchanged under the same key.
    #[test]
    fn write_then_read(
        name in name(),
        value in proptest::collection::vec(any::<u8>(), 0..512),
        key in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let raw = sign_value(&name, &value, &key).unwrap();
        prop_assert_eq!(read_signed(&name, Some(&raw), &key).unwrap(), value);
    }

    /// Reading with another key fails. Keys share a length because HMAC
    /// zero-pads short keys.
    #[test]
    fn other_key_fails(
        name in name(),
        value in proptest::collection::vec(any::<u8>(), 0..128),
        key in proptest::array::uniform32(any::<u8>()),
        other in proptest::array::uniform32(any::<u8>()),
    ) {
        prop_assume!(key != other);
        let raw = sign_value(&name, &value, &key).unwrap();
        prop_assert_eq!(read_signed(&name, Some(&raw), &other), Err(CookieError::InvalidValue));
    }

    /// One flipped bit anywhere in the payload is always detected.
    #[test]
    fn single_bit_flip_fails(
        value in proptest::collection::vec(any::<u8>(), 0..128),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let raw = sign_value("session", &value, b"key").unwrap();
        let mut payload = URL_SAFE.decode(&raw).unwrap();
        let i = index.index(payload.len());
        payload[i] ^= 1 << bit;

        let tampered = URL_SAFE.encode(&payload);
        prop_assert_eq!(
            read_signed("session", Some(&tampered), b"key"),
            Err(CookieError::InvalidValue)
        );
    }

    /// Payloads too short to hold a digest are invalid, never a panic.
    #[test]
    fn short_payload_is_invalid(payload in proptest::collection::vec(any::<u8>(), 0..DIGEST_LEN)) {
        let raw = URL_SAFE.encode(&payload);
        prop_assert_eq!(read_signed("session", Some(&raw), b"key"), Err(CookieError::InvalidValue));
    }

    /// Arbitrary stored strings never panic the reader.
    #[test]
    fn arbitrary_raw_value_never_panics(raw in "\\PC{0,128}") {
        prop_assert!(read_signed("session", Some(&raw), b"key").is_err());
    }
}
