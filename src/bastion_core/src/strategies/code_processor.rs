use async_trait::async_trait;

use crate::domain::{
    challenge_error::ChallengeError, code_type::CodeType, delivery::DeliveryPayload,
    owner_key::OwnerKey, request_context::RequestContext,
};

/// Result of a successful `validate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Terminal success; the challenge has been consumed.
    Passed,
    /// First phase passed; the client must come back with `token`.
    SecondCheckRequired { token: String },
}

/// Lifecycle of one code type: issue, then validate exactly once.
///
/// Processors keep no per-request state; everything lives in the store.
#[async_trait]
pub trait CodeProcessor: Send + Sync {
    fn code_type(&self) -> CodeType;

    async fn issue(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<DeliveryPayload, ChallengeError>;

    async fn validate(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError>;
}
