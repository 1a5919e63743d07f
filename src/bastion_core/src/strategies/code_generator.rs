use thiserror::Error;

use crate::domain::{
    challenge::ChallengeSecret,
    code_type::CodeType,
    delivery::{Artifact, OutOfBandMessage},
    request_context::RequestContext,
};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Missing or invalid request field: {0}")]
    InvalidInput(String),
    #[error("Failed to render challenge: {0}")]
    Render(String),
}

/// Output of a generator: the answer, what the client sees, and anything that
/// has to leave through a delivery channel.
#[derive(Debug, Clone)]
pub struct GeneratedChallenge {
    pub secret: ChallengeSecret,
    pub artifact: Artifact,
    pub out_of_band: Option<OutOfBandMessage>,
}

impl GeneratedChallenge {
    pub fn new(secret: ChallengeSecret, artifact: Artifact) -> Self {
        Self {
            secret,
            artifact,
            out_of_band: None,
        }
    }

    pub fn with_out_of_band(mut self, message: OutOfBandMessage) -> Self {
        self.out_of_band = Some(message);
        self
    }
}

/// Produces fresh challenges of one type.
///
/// Secrets must come from a cryptographically secure source.
pub trait CodeGenerator: Send + Sync {
    fn code_type(&self) -> CodeType;

    fn generate(&self, ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError>;
}
