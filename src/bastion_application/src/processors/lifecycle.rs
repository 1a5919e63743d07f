use std::{future::Future, time::Duration};

use bastion_core::{
    Challenge, ChallengeError, ChallengeKey, ChallengeStore, ChallengeStoreError, CodeType,
    DeliveryChannel, DeliveryPayload, GenerateError, GeneratedChallenge, OwnerKey,
};

/// How long issued challenges live and how they are consumed.
#[derive(Debug, Clone)]
pub struct ChallengePolicy {
    pub ttl: Duration,
    pub store_timeout: Duration,
    /// Keep the challenge after a wrong answer.
    pub reusable: bool,
}

impl ChallengePolicy {
    pub fn new(ttl: Duration, store_timeout: Duration) -> Self {
        Self {
            ttl,
            store_timeout,
            reusable: false,
        }
    }

    pub fn with_reusable(mut self, reusable: bool) -> Self {
        self.reusable = reusable;
        self
    }
}

/// Store access shared by all processors, bounded by the store timeout.
pub(crate) struct Lifecycle<S: ChallengeStore> {
    store: S,
    policy: ChallengePolicy,
}

impl<S: ChallengeStore> Lifecycle<S> {
    pub(crate) fn new(store: S, policy: ChallengePolicy) -> Self {
        Self { store, policy }
    }

    /// Builds and stores a generated challenge, then hands any out-of-band
    /// message to the delivery channel.
    pub(crate) async fn persist(
        &self,
        code_type: CodeType,
        owner: &OwnerKey,
        generated: GeneratedChallenge,
        delivery: Option<&dyn DeliveryChannel>,
    ) -> Result<DeliveryPayload, ChallengeError> {
        let key = ChallengeKey::new(code_type, owner.clone());
        let challenge = Challenge::new(code_type, generated.secret, self.policy.ttl)
            .map_err(|e| ChallengeError::GenerationFailed(e.to_string()))?
            .with_reusable(self.policy.reusable);

        self.bounded(self.store.set(&key, challenge, self.policy.ttl))
            .await?;

        if let Some(message) = generated.out_of_band {
            let Some(channel) = delivery else {
                self.discard(&key).await;
                return Err(ChallengeError::DeliveryFailed(
                    "no delivery channel configured".to_string(),
                ));
            };
            if let Err(e) = channel.deliver(&message).await {
                tracing::warn!(%code_type, error = %e, "Delivery of verification code failed");
                self.discard(&key).await;
                return Err(ChallengeError::DeliveryFailed(e.to_string()));
            }
        }

        Ok(DeliveryPayload::new(
            generated.artifact,
            self.policy.ttl.as_secs(),
        ))
    }

    /// Live challenge at `key`. Expired entries are removed on discovery.
    pub(crate) async fn load(&self, key: &ChallengeKey) -> Result<Challenge, ChallengeError> {
        let challenge = self
            .bounded(self.store.get(key))
            .await?
            .ok_or(ChallengeError::NotFound)?;

        if challenge.is_expired(chrono::Utc::now()) {
            self.discard(key).await;
            return Err(ChallengeError::Expired);
        }
        Ok(challenge)
    }

    /// Terminal success. Only the caller that actually removed the entry wins.
    pub(crate) async fn consume(&self, key: &ChallengeKey) -> Result<(), ChallengeError> {
        if self.bounded(self.store.delete(key)).await? {
            Ok(())
        } else {
            Err(ChallengeError::NotFound)
        }
    }

    /// Removal after a failed attempt; the failure being reported wins over
    /// any store error here.
    pub(crate) async fn discard(&self, key: &ChallengeKey) {
        if let Err(e) = self.bounded(self.store.delete(key)).await {
            tracing::warn!(%key, error = %e, "Failed to remove challenge");
        }
    }

    /// Wrong answer: removed unless the challenge is reusable.
    pub(crate) async fn reject(
        &self,
        key: &ChallengeKey,
        challenge: &Challenge,
        error: ChallengeError,
    ) -> ChallengeError {
        if !challenge.is_reusable() {
            self.discard(key).await;
        }
        error
    }

    pub(crate) async fn compare_and_set(
        &self,
        key: &ChallengeKey,
        expected_version: u64,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<bool, ChallengeError> {
        self.bounded(
            self.store
                .compare_and_set(key, expected_version, challenge, ttl),
        )
        .await
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, ChallengeError>
    where
        F: Future<Output = Result<T, ChallengeStoreError>>,
    {
        match tokio::time::timeout(self.policy.store_timeout, operation).await {
            Ok(result) => result.map_err(|e| ChallengeError::StoreUnavailable(e.to_string())),
            Err(_) => Err(ChallengeError::StoreUnavailable(
                "challenge store timed out".to_string(),
            )),
        }
    }
}

pub(crate) fn generation_error(error: GenerateError) -> ChallengeError {
    match error {
        GenerateError::InvalidInput(field) => ChallengeError::MalformedInput { field },
        GenerateError::Render(reason) => ChallengeError::GenerationFailed(reason),
    }
}
