//! API key handling.
//!
//! The key is only ever exposed when building the `Authorization` header.
//! `Debug` and `Display` print a mask so the key can't leak through logs.

use std::fmt;

/// Prefix the service expects in front of the key in the `Authorization` header.
pub const API_KEY_PREFIX: &str = "App";

/// Masked form used whenever a key is formatted.
const MASK: &str = "***";

/// An Infobip API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key in clear text.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&MASK).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

/// Authentication context for a single API call.
///
/// Built fresh for every request; nothing beyond the key itself is cached.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    key: &'a ApiKey,
}

impl<'a> Auth<'a> {
    pub fn new(key: &'a ApiKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &ApiKey {
        self.key
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{API_KEY_PREFIX} {}", self.key.expose())
    }
}
