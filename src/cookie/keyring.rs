//! Signed cookies tagged with a key id.
//!
//! ```text
//! base64url( key_id (1) | HMAC-SHA256(key, name || value) (32) | value )
//! ```
//!
//! New cookies are signed with the primary key. Cookies carrying the id of
//! any other registered key still verify, so a caller can introduce a new
//! key while old cookies expire.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use super::{Cookie, header};
use crate::error::CookieError;

/// Registered signing keys indexed by a one-byte id.
#[derive(Clone)]
pub struct Keyring {
    primary: u8,
    keys: BTreeMap<u8, Zeroizing<Vec<u8>>>,
}

impl Keyring {
    /// Creates a keyring whose primary (signing) key is `key` under `id`.
    pub fn new(id: u8, key: impl Into<Vec<u8>>) -> Self {
        let mut keys = BTreeMap::new();
        keys.insert(id, Zeroizing::new(key.into()));
        Self { primary: id, keys }
    }

    /// Registers a key that is accepted when reading but not used to sign.
    ///
    /// Registering the primary id again replaces the primary key.
    pub fn with_key(mut self, id: u8, key: impl Into<Vec<u8>>) -> Self {
        self.keys.insert(id, Zeroizing::new(key.into()));
        self
    }

    pub fn primary_id(&self) -> u8 {
        self.primary
    }

    pub fn contains(&self, id: u8) -> bool {
        self.keys.contains_key(&id)
    }

    /// Like [`super::write_signed`], signing with the primary key and
    /// prefixing its id.
    pub fn write_signed(&self, cookie: Cookie, value: &[u8]) -> Result<Cookie, CookieError> {
        header::validate(&cookie)?;

        let sealed = super::seal(cookie.name(), value, self.primary_key())?;
        let mut payload = Vec::with_capacity(1 + sealed.len());
        payload.push(self.primary);
        payload.extend_from_slice(&sealed);

        super::finish(cookie, &payload)
    }

    /// Like [`super::read_signed`], selecting the key by the id in the value.
    ///
    /// Unknown ids are [`CookieError::InvalidValue`].
    pub fn read_signed(&self, name: &str, raw: Option<&str>) -> Result<Vec<u8>, CookieError> {
        let raw = raw.ok_or(CookieError::NotFound)?;
        let payload = super::decode(raw)?;

        let Some((id, sealed)) = payload.split_first() else {
            return Err(CookieError::InvalidValue);
        };
        let Some(key) = self.keys.get(id) else {
            debug!(cookie = name, key_id = *id, "signed cookie names an unknown key");
            return Err(CookieError::InvalidValue);
        };

        super::open(name, sealed, key)
    }

    fn primary_key(&self) -> &[u8] {
        // the primary id is inserted by `new` and never removed
        self.keys
            .get(&self.primary)
            .map(|k| k.as_slice())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyring")
            .field("primary", &self.primary)
            .field("ids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
