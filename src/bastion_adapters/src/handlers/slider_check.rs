//! Framework-agnostic slider first-check handler.

use bastion_application::ProcessorRegistry;
use bastion_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, ChallengeError,
    ChallengeFailureHandler, ChallengeRejection, CodeType, RequestContext, ValidationOutcome,
};

use super::owner_session::OwnerSession;

/// Run slider phase one and hand out the second-check token.
///
/// The client submits the dropped position and issued token; on success the
/// body is `{"token": ...}`, which the guarded request must then carry.
#[tracing::instrument(name = "SliderCheck", skip_all)]
pub async fn handle_slider_check<R, B, F>(
    registry: &ProcessorRegistry,
    session: &OwnerSession,
    failure_handler: &F,
    request: &R,
    ctx: &RequestContext,
    builder: B,
) -> B::Response
where
    R: AuthRequest,
    B: AuthResponseBuilder,
    F: ChallengeFailureHandler,
{
    let outcome = match (session.owner(request), registry.resolve(CodeType::Slider)) {
        (Some(owner), Ok(processor)) => processor.validate(&owner, ctx).await,
        (None, _) => Err(ChallengeError::NotFound),
        (_, Err(e)) => Err(e),
    };

    match outcome {
        Ok(ValidationOutcome::SecondCheckRequired { token }) => {
            builder.ok_json(serde_json::json!({ "token": token }))
        }
        // The second-check token was submitted here instead of the guarded request.
        Ok(ValidationOutcome::Passed) => builder.ok_json(serde_json::json!({ "passed": true })),
        Err(error) => {
            let rejection = ChallengeRejection::new(
                &error,
                Some(CodeType::Slider),
                request.path(),
                request.remote_addr(),
            );
            tracing::warn!(kind = %rejection.kind, "Slider check failed");
            failure_handler.on_failure(builder, &rejection)
        }
    }
}
