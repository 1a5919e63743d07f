use bastion_core::{
    ChallengeError, ChallengeRejection, CodeType, OwnerKey, RequestContext, ValidationOutcome,
};

use crate::{classifier::RequestClassifier, registry::ProcessorRegistry};

/// Outcome of running a request through the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// No code type guards this request.
    NotRequired,
    Passed(CodeType),
    /// Refused; the failure handler renders the response.
    Rejected(ChallengeRejection),
    /// Slider phase one passed on a guarded URI; the client must resubmit
    /// with `token`.
    SecondCheckRequired { token: String },
}

/// Intercepts state-changing requests and validates the verification code
/// the classifier says they need.
///
/// The request is pending while the processor runs. Failures are never
/// retried here; the client requests a new challenge.
pub struct ChallengeGate {
    classifier: RequestClassifier,
    registry: ProcessorRegistry,
}

impl ChallengeGate {
    pub fn new(classifier: RequestClassifier, registry: ProcessorRegistry) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &RequestClassifier {
        &self.classifier
    }

    #[tracing::instrument(
        name = "ChallengeGate::check",
        skip_all,
        fields(method = %ctx.method(), uri = %ctx.path())
    )]
    pub async fn check(&self, owner: Option<&OwnerKey>, ctx: &RequestContext) -> GateDecision {
        let Some(code_type) = self.classifier.classify(ctx.method(), ctx.path()) else {
            return GateDecision::NotRequired;
        };

        match self.validate(code_type, owner, ctx).await {
            Ok(ValidationOutcome::Passed) => {
                tracing::info!(%code_type, "Verification code check passed");
                GateDecision::Passed(code_type)
            }
            Ok(ValidationOutcome::SecondCheckRequired { token }) => {
                tracing::info!(%code_type, "Verification code first check passed");
                GateDecision::SecondCheckRequired { token }
            }
            Err(error) => {
                let rejection = ChallengeRejection::new(
                    &error,
                    Some(code_type),
                    ctx.path(),
                    ctx.remote_addr().map(str::to_string),
                );
                if rejection.kind.is_client_error() {
                    tracing::warn!(
                        %code_type,
                        kind = %rejection.kind,
                        remote_addr = rejection.remote_addr.as_deref().unwrap_or("unknown"),
                        "Verification code check failed"
                    );
                } else {
                    tracing::error!(
                        %code_type,
                        kind = %rejection.kind,
                        error = %error,
                        "Verification code check could not complete"
                    );
                }
                GateDecision::Rejected(rejection)
            }
        }
    }

    async fn validate(
        &self,
        code_type: CodeType,
        owner: Option<&OwnerKey>,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        // Without an owner there is nothing a challenge could have been bound to.
        let owner = owner.ok_or(ChallengeError::NotFound)?;
        let processor = self.registry.resolve(code_type)?;
        processor.validate(owner, ctx).await
    }
}
