//! `Set-Cookie` serialization and `Cookie` request header lookup.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::CookieError;

/// `SameSite` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie as sent in a `Set-Cookie` response header.
///
/// The transport attributes are chosen by the caller; they only matter here
/// because they count towards the size limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    expires: Option<DateTime<Utc>>,
    max_age: Option<i64>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Zero leaves `Max-Age` out; negative values are written as
    /// `Max-Age=0` (delete now).
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    /// Length of the serialized `Set-Cookie` value.
    pub fn serialized_len(&self) -> usize {
        self.to_string().len()
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain.trim_start_matches('.'))?;
        }
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }
        match self.max_age {
            Some(max_age) if max_age > 0 => write!(f, "; Max-Age={max_age}")?,
            Some(max_age) if max_age < 0 => f.write_str("; Max-Age=0")?,
            _ => {}
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site.as_str())?;
        }
        Ok(())
    }
}

/// Checks everything `Display` writes verbatim: the name, `Path` and
/// `Domain`. The value is always base64url and needs no check.
pub(crate) fn validate(cookie: &Cookie) -> Result<(), CookieError> {
    validate_name(&cookie.name)?;
    if let Some(path) = &cookie.path {
        validate_path(path)?;
    }
    if let Some(domain) = &cookie.domain {
        validate_domain(domain)?;
    }
    Ok(())
}

/// Rejects names that are not an HTTP token.
pub(crate) fn validate_name(name: &str) -> Result<(), CookieError> {
    let is_token_char =
        |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);

    if name.is_empty() || !name.bytes().all(is_token_char) {
        return Err(CookieError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Path values are printable ASCII without `;`.
fn validate_path(path: &str) -> Result<(), CookieError> {
    if !path.bytes().all(|b| (0x20..0x7f).contains(&b) && b != b';') {
        return Err(CookieError::InvalidAttribute {
            attribute: "Path",
            value: path.to_string(),
        });
    }
    Ok(())
}

/// Host names (or IPv4 addresses), optionally with a leading dot.
fn validate_domain(domain: &str) -> Result<(), CookieError> {
    let host = domain.strip_prefix('.').unwrap_or(domain);
    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    };

    if host.is_empty() || host.len() > 255 || !host.split('.').all(valid_label) {
        return Err(CookieError::InvalidAttribute {
            attribute: "Domain",
            value: domain.to_string(),
        });
    }
    Ok(())
}

/// Finds the raw value of cookie `name` in a request `Cookie` header.
///
/// Surrounding double quotes are stripped. The first match wins.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
}
