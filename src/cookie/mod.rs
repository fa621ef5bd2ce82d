//! HMAC-SHA256 signed cookies.
//!
//! Wire form of a signed value:
//! ```text
//! base64url( HMAC-SHA256(key, name || value) (32) | value )
//! ```
//!
//! The digest has a fixed length, so no separator is needed. Signing is
//! deterministic: the same name, value and key always give the same cookie.

mod header;
mod keyring;

pub use header::{Cookie, SameSite, find_cookie};
pub use keyring::Keyring;

use base64::{Engine, engine::general_purpose::URL_SAFE};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, trace};

use crate::ct::ConstantTimeEquals;
use crate::error::CookieError;

/// Length of the HMAC-SHA256 digest prepended to every value.
pub const DIGEST_LEN: usize = 32;
/// Largest serialized `Set-Cookie` value browsers are required to accept.
pub const MAX_COOKIE_LEN: usize = 4096;

type HmacSha256 = Hmac<Sha256>;

/// Signs `value` under the cookie's name and stores the encoded result as
/// the cookie's value. Any previous value of `cookie` is replaced.
///
/// # Errors
///
/// - [`CookieError::InvalidName`] if the name is not an HTTP token
/// - [`CookieError::InvalidAttribute`] if `Path` or `Domain` would break
///   out of the header (`;`, CR/LF, other control bytes)
/// - [`CookieError::ValueTooLong`] if the full `Set-Cookie` string would
///   exceed [`MAX_COOKIE_LEN`]; nothing is returned in that case
pub fn write_signed(cookie: Cookie, value: &[u8], key: &[u8]) -> Result<Cookie, CookieError> {
    header::validate(&cookie)?;
    let payload = seal(cookie.name(), value, key)?;
    finish(cookie, &payload)
}

/// Signs `value` for cookie `name` and returns only the encoded value.
pub fn sign_value(name: &str, value: &[u8], key: &[u8]) -> Result<String, CookieError> {
    write_signed(Cookie::new(name, String::new()), value, key).map(|c| c.value().to_string())
}

/// Verifies a stored cookie value and returns the original bytes.
///
/// `raw` is the value found in the request, or `None` when the request did
/// not carry a cookie with that name.
///
/// # Errors
///
/// - [`CookieError::NotFound`] if `raw` is `None`
/// - [`CookieError::InvalidValue`] if the value is not base64url, is too
///   short to hold a digest, or its digest does not match
pub fn read_signed(name: &str, raw: Option<&str>, key: &[u8]) -> Result<Vec<u8>, CookieError> {
    let raw = raw.ok_or(CookieError::NotFound)?;
    let payload = decode(raw)?;
    open(name, &payload, key)
}

/// [`read_signed`] over a request `Cookie` header.
pub fn read_signed_from_header(
    header: Option<&str>,
    name: &str,
    key: &[u8],
) -> Result<Vec<u8>, CookieError> {
    read_signed(name, header.and_then(|h| find_cookie(h, name)), key)
}

fn mac(name: &str, value: &[u8], key: &[u8]) -> Result<[u8; DIGEST_LEN], CookieError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| CookieError::InvalidKey)?;
    mac.update(name.as_bytes());
    mac.update(value);
    Ok(mac.finalize().into_bytes().into())
}

/// `digest || value`
pub(crate) fn seal(name: &str, value: &[u8], key: &[u8]) -> Result<Vec<u8>, CookieError> {
    let digest = mac(name, value, key)?;

    let mut payload = Vec::with_capacity(DIGEST_LEN + value.len());
    payload.extend_from_slice(&digest);
    payload.extend_from_slice(value);
    Ok(payload)
}

/// Inverse of [`seal`].
pub(crate) fn open(name: &str, payload: &[u8], key: &[u8]) -> Result<Vec<u8>, CookieError> {
    if payload.len() < DIGEST_LEN {
        debug!(cookie = name, len = payload.len(), "signed cookie shorter than digest");
        return Err(CookieError::InvalidValue);
    }

    let (digest, value) = payload.split_at(DIGEST_LEN);
    let expected = mac(name, value, key)?;

    if !expected[..].constant_time_equals(digest) {
        debug!(cookie = name, "signed cookie failed verification");
        return Err(CookieError::InvalidValue);
    }

    trace!(cookie = name, "signed cookie verified");
    Ok(value.to_vec())
}

pub(crate) fn decode(raw: &str) -> Result<Vec<u8>, CookieError> {
    URL_SAFE.decode(raw).map_err(|e| {
        debug!(error = %e, "signed cookie is not base64url");
        CookieError::InvalidValue
    })
}

/// Encodes `payload` into the cookie and enforces the size ceiling.
pub(crate) fn finish(mut cookie: Cookie, payload: &[u8]) -> Result<Cookie, CookieError> {
    cookie.set_value(URL_SAFE.encode(payload));

    let len = cookie.serialized_len();
    if len > MAX_COOKIE_LEN {
        debug!(cookie = cookie.name(), len, "signed cookie exceeds size limit");
        return Err(CookieError::ValueTooLong {
            len,
            max: MAX_COOKIE_LEN,
        });
    }
    Ok(cookie)
}
