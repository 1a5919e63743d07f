use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identity a challenge is bound to: a session id, a bearer-token subject or
/// any other per-client key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey(String);

#[derive(Debug, Error, PartialEq)]
pub enum OwnerKeyError {
    #[error("Owner key must not be empty")]
    Empty,
    #[error("Owner key contains invalid characters")]
    InvalidCharacters,
}

impl OwnerKey {
    /// Fresh random key, used when a client has no session yet.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(key: &str) -> Result<Self, OwnerKeyError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(OwnerKeyError::Empty);
        }
        // Keys end up in cache keys and cookies.
        if key.chars().any(|c| c.is_whitespace() || c == ';' || c == ',') {
            return Err(OwnerKeyError::InvalidCharacters);
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OwnerKey {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for OwnerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
