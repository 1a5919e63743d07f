use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use bastion_core::{
    Artifact, Challenge, ChallengeCode, ChallengeKey, ChallengeSecret, ChallengeStore,
    ChallengeStoreError, CodeGenerator, CodeType, DeliveryChannel, DeliveryError, GenerateError,
    GeneratedChallenge, OutOfBandMessage, Point, RequestContext, SliderTarget, TrackPath,
};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MockChallengeStore {
    entries: Arc<RwLock<HashMap<ChallengeKey, (Challenge, tokio::time::Instant)>>>,
    delay: Option<Duration>,
}

impl MockChallengeStore {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn peek(&self, key: &ChallengeKey) -> Option<Challenge> {
        self.entries.read().await.get(key).map(|(c, _)| c.clone())
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChallengeStore for MockChallengeStore {
    async fn get(&self, key: &ChallengeKey) -> Result<Option<Challenge>, ChallengeStoreError> {
        self.pause().await;
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, deadline)| *deadline > tokio::time::Instant::now())
            .map(|(c, _)| c.clone()))
    }

    async fn set(
        &self,
        key: &ChallengeKey,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<(), ChallengeStoreError> {
        self.pause().await;
        let deadline = tokio::time::Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.clone(), (challenge, deadline));
        Ok(())
    }

    async fn delete(&self, key: &ChallengeKey) -> Result<bool, ChallengeStoreError> {
        self.pause().await;
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn compare_and_set(
        &self,
        key: &ChallengeKey,
        expected_version: u64,
        challenge: Challenge,
        ttl: Duration,
    ) -> Result<bool, ChallengeStoreError> {
        self.pause().await;
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some((current, _)) if current.version() == expected_version => {
                let deadline = tokio::time::Instant::now() + ttl;
                entries.insert(key.clone(), (challenge, deadline));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Generator returning a known secret so tests can answer it.
pub struct FixedCodeGenerator {
    code_type: CodeType,
    secret: ChallengeSecret,
    artifact: Artifact,
    out_of_band: bool,
}

impl FixedCodeGenerator {
    pub fn image(code: &str) -> Self {
        Self {
            code_type: CodeType::Image,
            secret: ChallengeSecret::Code(ChallengeCode::new(code.to_string())),
            artifact: Artifact::Image {
                image: String::new(),
            },
            out_of_band: false,
        }
    }

    pub fn customize(code: &str) -> Self {
        Self {
            code_type: CodeType::Customize,
            secret: ChallengeSecret::Code(ChallengeCode::new(code.to_string())),
            artifact: Artifact::Customize,
            out_of_band: true,
        }
    }

    pub fn slider(x: i32, y: i32, token: &str) -> Self {
        Self {
            code_type: CodeType::Slider,
            secret: ChallengeSecret::Slider(SliderTarget {
                x,
                y,
                token: ChallengeCode::new(token.to_string()),
            }),
            artifact: Artifact::Slider {
                token: token.to_string(),
                background: String::new(),
                piece: String::new(),
                y,
                piece_width: 40,
                piece_height: 40,
            },
            out_of_band: false,
        }
    }

    pub fn track(points: Vec<Point>) -> Self {
        let count = points.len();
        Self {
            code_type: CodeType::Track,
            secret: ChallengeSecret::Track(TrackPath { points }),
            artifact: Artifact::Track {
                image: String::new(),
                points: count,
            },
            out_of_band: false,
        }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn code_type(&self) -> CodeType {
        self.code_type
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let generated = GeneratedChallenge::new(self.secret.clone(), self.artifact.clone());
        match (&self.secret, self.out_of_band) {
            (ChallengeSecret::Code(code), true) => {
                Ok(generated.with_out_of_band(OutOfBandMessage::Custom { code: code.clone() }))
            }
            _ => Ok(generated),
        }
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    delivered: RwLock<usize>,
    fail: bool,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        Self {
            delivered: RwLock::new(0),
            fail: true,
        }
    }

    pub async fn delivered(&self) -> usize {
        *self.delivered.read().await
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn deliver(&self, _message: &OutOfBandMessage) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Unreachable("gateway down".to_string()));
        }
        *self.delivered.write().await += 1;
        Ok(())
    }
}
