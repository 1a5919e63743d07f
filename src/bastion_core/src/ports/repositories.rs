use std::{fmt, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{challenge::Challenge, code_type::CodeType, owner_key::OwnerKey};

/// Store address of a challenge: one slot per code type and owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeKey {
    code_type: CodeType,
    owner: OwnerKey,
}

impl ChallengeKey {
    pub fn new(code_type: CodeType, owner: OwnerKey) -> Self {
        Self { code_type, owner }
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }
}

impl fmt::Display for ChallengeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "challenge:{}:{}", self.code_type, self.owner)
    }
}

// ChallengeStore port trait and errors
#[derive(Debug, Error)]
pub enum ChallengeStoreError {
    #[error("Challenge store unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to (de)serialize challenge: {0}")]
    Serialization(String),
}

impl PartialEq for ChallengeStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Unavailable(_), Self::Unavailable(_))
                | (Self::Serialization(_), Self::Serialization(_))
        )
    }
}

/// TTL key-value store holding issued challenges.
///
/// Expired entries are indistinguishable from missing ones.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn get(&self, key: &ChallengeKey) -> Result<Option<Challenge>, ChallengeStoreError>;

    async fn set(
        &self,
        key: &ChallengeKey,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<(), ChallengeStoreError>;

    /// Returns whether this call removed a live entry.
    async fn delete(&self, key: &ChallengeKey) -> Result<bool, ChallengeStoreError>;

    /// Replaces the entry only if it is still at `expected_version`.
    async fn compare_and_set(
        &self,
        key: &ChallengeKey,
        expected_version: u64,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<bool, ChallengeStoreError>;
}
