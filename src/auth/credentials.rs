use std::fmt;

use base64::Engine;
use http::header::AUTHORIZATION;
use http::HeaderMap;

const BASIC_SCHEME: &str = "basic";

/// Username/password pair taken from a `Basic` authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Extract credentials from the request's `Authorization` header.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Self::from_authorization(value)
    }

    /// Parse a raw `Authorization` header value.
    ///
    /// Returns `None` unless the value is `Basic <base64(user:pass)>`. The
    /// scheme is matched case-insensitively and the decoded text is split at
    /// the first `:`, so passwords may contain colons.
    pub fn from_authorization(value: &str) -> Option<Self> {
        let (scheme, payload) = value.trim().split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return None;
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self::new(username, password))
    }

    /// Cache lookup key: `{username byte length}:{username}:{password}`.
    ///
    /// The length prefix keeps usernames containing `:` from colliding with
    /// other pairs, and a different password always yields a different key.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.username.len(), self.username, self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
