//! Text encoding of a password record.
//!
//! ```text
//! $argon2id$v=19$m=<mem_kib>,t=<iterations>,p=<parallelism>$<salt>$<hash>
//! ```
//!
//! Salt and hash are unpadded standard base64. Splitting on `$` always yields
//! exactly six fields, the first one empty.

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

use super::{Argon2Params, MIN_SALT_LEN, VARIANT, VERSION};
use crate::error::PasswordError;

const FIELD_COUNT: usize = 6;

/// A parsed password record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    params: Argon2Params,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl PasswordRecord {
    pub(crate) fn new(params: Argon2Params, salt: Vec<u8>, hash: Vec<u8>) -> Self {
        Self { params, salt, hash }
    }

    /// Parses an encoded record.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::InvalidFormat`] if:
    /// - the record does not split into exactly six `$` fields
    /// - the variant is not `argon2id` or the version is not 19
    /// - the parameter field is not `m=..,t=..,p=..` with valid values
    /// - salt or hash are not unpadded standard base64
    pub fn parse(encoded: &str) -> Result<Self, PasswordError> {
        let fields: Vec<&str> = encoded.split('$').collect();
        let [lead, variant, version, params, salt, hash] = fields.as_slice() else {
            return Err(invalid(format!(
                "expected {FIELD_COUNT} '$'-separated fields, found {}",
                fields.len()
            )));
        };

        if !lead.is_empty() {
            return Err(invalid("record must start with '$'".to_string()));
        }
        if *variant != VARIANT {
            return Err(invalid(format!("unsupported variant {variant:?}")));
        }
        parse_version(version)?;
        let params = parse_params(params)?;

        let salt = decode_segment(salt, "salt")?;
        if salt.len() < MIN_SALT_LEN {
            return Err(invalid(format!(
                "salt too short: {} bytes (minimum {MIN_SALT_LEN})",
                salt.len()
            )));
        }
        let hash = decode_segment(hash, "hash")?;

        Ok(Self { params, salt, hash })
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
}

impl fmt::Display for PasswordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${VARIANT}$v={VERSION}$m={},t={},p={}${}${}",
            self.params.mem_cost_kib(),
            self.params.time_cost(),
            self.params.parallelism(),
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.hash),
        )
    }
}

impl FromStr for PasswordRecord {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_version(field: &str) -> Result<(), PasswordError> {
    let version = field
        .strip_prefix("v=")
        .and_then(parse_decimal)
        .ok_or_else(|| invalid(format!("malformed version field {field:?}")))?;

    if version != VERSION {
        return Err(invalid(format!("unsupported version {version}")));
    }
    Ok(())
}

fn parse_params(field: &str) -> Result<Argon2Params, PasswordError> {
    let malformed = || invalid(format!("malformed parameter field {field:?}"));

    let mut parts = field.split(',');
    let mut next = |prefix: &str| -> Result<u32, PasswordError> {
        parts
            .next()
            .and_then(|part| part.strip_prefix(prefix))
            .and_then(parse_decimal)
            .ok_or_else(malformed)
    };

    let mem_cost_kib = next("m=")?;
    let time_cost = next("t=")?;
    let parallelism = next("p=")?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    Argon2Params::new(mem_cost_kib, time_cost, parallelism).map_err(|e| invalid(e.to_string()))
}

/// Canonical decimal only: digits, no sign, no leading zero. Anything
/// else would not print back to the same text.
fn parse_decimal(text: &str) -> Option<u32> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return None;
    }
    text.parse().ok()
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>, PasswordError> {
    if segment.is_empty() {
        return Err(invalid(format!("empty {what}")));
    }
    STANDARD_NO_PAD
        .decode(segment)
        .map_err(|e| invalid(format!("{what} is not valid base64: {e}")))
}

fn invalid(reason: String) -> PasswordError {
    PasswordError::InvalidFormat(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    // salt "saltsaltsaltsalt", 32 zero bytes of hash
    const SAMPLE: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    fn assert_invalid(encoded: &str) {
        match PasswordRecord::parse(encoded) {
            Err(PasswordError::InvalidFormat(_)) => {}
            other => panic!("expected InvalidFormat for {encoded:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_and_reencodes_exactly() {
        let record = PasswordRecord::parse(SAMPLE).unwrap();
        assert_eq!(record.params(), &Argon2Params::default());
        assert_eq!(record.salt(), b"saltsaltsaltsalt");
        assert_eq!(record.hash(), &[0u8; 32]);
        assert_eq!(record.to_string(), SAMPLE);
    }

    #[test]
    fn from_str_matches_parse() {
        let record: PasswordRecord = SAMPLE.parse().unwrap();
        assert_eq!(record, PasswordRecord::parse(SAMPLE).unwrap());
    }

    #[test]
    fn wrong_field_count_is_invalid() {
        assert_invalid("");
        assert_invalid("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA");
        assert_invalid(&format!("{SAMPLE}$extra"));
        assert_invalid("not a hash at all");
    }

    #[test]
    fn missing_leading_dollar_is_invalid() {
        assert_invalid(&format!("x{SAMPLE}"));
    }

    #[test]
    fn other_variants_and_versions_are_invalid() {
        assert_invalid(&SAMPLE.replace("argon2id", "argon2i"));
        assert_invalid(&SAMPLE.replace("v=19", "v=16"));
        assert_invalid(&SAMPLE.replace("v=19", "19"));
    }

    #[test]
    fn malformed_params_are_invalid() {
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "t=2,m=19456,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=19456,t=2"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=19456,t=2,p=1,x=3"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=abc,t=2,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=19456,t=0,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=+19456,t=2,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=019456,t=2,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=19456,t=02,p=1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=19456,t=2,p= 1"));
        assert_invalid(&SAMPLE.replace("m=19456,t=2,p=1", "m=268435455,t=2,p=1"));
        assert_invalid(&SAMPLE.replace("v=19", "v=+19"));
        assert_invalid(&SAMPLE.replace("v=19", "v=019"));
    }

    #[test]
    fn undecodable_segments_are_invalid() {
        assert_invalid(&SAMPLE.replace("c2FsdHNhbHRzYWx0c2FsdA", "!!!!"));
        assert_invalid(&SAMPLE.replace("c2FsdHNhbHRzYWx0c2FsdA", "c2FsdHNhbHRzYWx0c2FsdA=="));
        assert_invalid(&SAMPLE.replace("c2FsdHNhbHRzYWx0c2FsdA", ""));
    }

    #[test]
    fn short_salt_is_invalid() {
        // "abc"
        assert_invalid(&SAMPLE.replace("c2FsdHNhbHRzYWx0c2FsdA", "YWJj"));
    }
}
