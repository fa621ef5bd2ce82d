use thiserror::Error;

/// Errors produced while hashing or verifying passwords.
///
/// A password that simply does not match is not an error: verification
/// returns `Ok(false)` for that case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The OS random generator could not produce a salt.
    #[error("OS random generator unavailable")]
    RandomSource,

    /// The encoded password record is structurally malformed.
    #[error("invalid password record: {0}")]
    InvalidFormat(String),

    /// Argon2 cost parameters were rejected.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    /// The key derivation itself failed (e.g. memory allocation).
    #[error("argon2 key derivation failed: {0}")]
    Derivation(String),
}

/// Errors produced while writing or reading signed cookies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("cookie not found")]
    NotFound,

    /// Undecodable, truncated, or carrying a signature that does not match.
    #[error("invalid cookie value")]
    InvalidValue,

    #[error("cookie is too long: {len} bytes (maximum {max})")]
    ValueTooLong { len: usize, max: usize },

    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),

    /// A `Path` or `Domain` that would change the shape of the header.
    #[error("invalid cookie {attribute} attribute: {value:?}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },

    #[error("signing key rejected by hmac")]
    InvalidKey,
}
