//! Argon2id password hashing.
//!
//! [`hash_password`] produces a self-describing record string;
//! [`verify_password`] re-derives the hash with the parameters stored in
//! that record and compares in constant time.

mod params;
mod record;
mod salt;

pub use params::{Argon2Params, MAX_MEM_COST_KIB, MAX_PARALLELISM, MAX_TIME_COST};
pub use record::PasswordRecord;

use tracing::{debug, trace};

use crate::ct::ConstantTimeEquals;
use crate::error::PasswordError;

/// Algorithm tag written into every record.
pub const VARIANT: &str = "argon2id";
/// Argon2 version 0x13.
pub const VERSION: u32 = 0x13;
/// Length of freshly generated salts.
pub const SALT_LEN: usize = 16;
/// Length of the derived hash.
pub const HASH_LEN: usize = 32;
/// Shortest salt accepted when parsing a record.
pub const MIN_SALT_LEN: usize = 8;

/// Hashes `password` with the default [`Argon2Params`].
///
/// # Errors
///
/// Returns [`PasswordError::RandomSource`] if no salt could be generated.
pub fn hash_password(password: &[u8]) -> Result<String, PasswordError> {
    hash_password_with(password, &Argon2Params::default())
}

/// Hashes `password` with explicit cost parameters.
///
/// Every call uses a new random salt, so hashing the same password twice
/// never yields the same record.
pub fn hash_password_with(password: &[u8], params: &Argon2Params) -> Result<String, PasswordError> {
    params.validate()?;

    let salt = salt::generate_salt()?;
    let hash = params.derive(password, &salt)?;

    let record = PasswordRecord::new(*params, salt.to_vec(), hash.to_vec());
    trace!(
        m = params.mem_cost_kib(),
        t = params.time_cost(),
        p = params.parallelism(),
        "hashed password"
    );
    Ok(record.to_string())
}

/// Checks `password` against an encoded record.
///
/// Returns `Ok(false)` only when the record is well formed and the password
/// does not match.
///
/// # Errors
///
/// Returns [`PasswordError::InvalidFormat`] if the record cannot be parsed.
pub fn verify_password(password: &[u8], encoded: &str) -> Result<bool, PasswordError> {
    let record = parse_logged(encoded)?;

    let candidate = record.params().derive(password, record.salt())?;
    let matches = candidate[..].constant_time_equals(record.hash());

    trace!(matches, "verified password");
    Ok(matches)
}

/// Reports whether a record was produced with parameters other than `current`.
///
/// Callers typically rehash with [`hash_password_with`] after a successful
/// verification when this returns `true`.
pub fn needs_rehash(encoded: &str, current: &Argon2Params) -> Result<bool, PasswordError> {
    let record = parse_logged(encoded)?;
    Ok(record.params() != current || record.hash().len() != HASH_LEN)
}

fn parse_logged(encoded: &str) -> Result<PasswordRecord, PasswordError> {
    PasswordRecord::parse(encoded).inspect_err(|e| debug!(error = %e, "rejected password record"))
}
