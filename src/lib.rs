//! Password hashing and signed cookies for web services.
//!
//! Two independent, stateless components:
//!
//! - [`password`]: Argon2id hashing into a self-describing
//!   `$argon2id$v=19$m=..,t=..,p=..$salt$hash` record, and verification
//!   against it.
//! - [`cookie`]: HMAC-SHA256 signed cookie values the server can trust
//!   without storing them.
//!
//! Both compare secret-derived bytes through [`ct`] only.

pub mod cookie;
pub mod ct;
mod error;
pub mod password;

pub use crate::cookie::{
    Cookie, Keyring, SameSite, find_cookie, read_signed, read_signed_from_header, sign_value,
    write_signed,
};
pub use crate::error::{CookieError, PasswordError};
pub use crate::password::{
    Argon2Params, PasswordRecord, hash_password, hash_password_with, needs_rehash,
    verify_password,
};
