use std::{collections::HashMap, sync::Arc, time::Duration};

use bastion_core::{Challenge, ChallengeKey, ChallengeStore, ChallengeStoreError};
use tokio::{sync::RwLock, time::Instant};

/// In-process challenge store for single-node deployments and tests.
///
/// Entries expire lazily: a read past the deadline behaves as if the entry was
/// never there and drops it.
#[derive(Default, Clone)]
pub struct HashMapChallengeStore {
    entries: Arc<RwLock<HashMap<ChallengeKey, Entry>>>,
}

#[derive(Clone)]
struct Entry {
    challenge: Challenge,
    deadline: Instant,
}

impl Entry {
    fn new(challenge: Challenge, ttl: Duration) -> Self {
        Self {
            challenge,
            deadline: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        self.deadline > Instant::now()
    }
}

impl HashMapChallengeStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries, expired ones included until touched.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ChallengeStore for HashMapChallengeStore {
    async fn get(&self, key: &ChallengeKey) -> Result<Option<Challenge>, ChallengeStoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live() => return Ok(Some(entry.challenge.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live()) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &ChallengeKey,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<(), ChallengeStoreError> {
        self.entries
            .write()
            .await
            .insert(key.clone(), Entry::new(challenge, ttl));
        Ok(())
    }

    async fn delete(&self, key: &ChallengeKey) -> Result<bool, ChallengeStoreError> {
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live()))
    }

    async fn compare_and_set(
        &self,
        key: &ChallengeKey,
        expected_version: u64,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<bool, ChallengeStoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_live() && entry.challenge.version() == expected_version => {
                entries.insert(key.clone(), Entry::new(challenge, ttl));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
