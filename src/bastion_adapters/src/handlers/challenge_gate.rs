//! Framework-agnostic verification code gate.

use bastion_application::{ChallengeGate, GateDecision};
use bastion_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, ChallengeFailureHandler,
    RequestContext,
};

use super::owner_session::OwnerSession;

/// Check the request against the gate.
///
/// `Ok(())` lets the request through; `Err` carries the response that
/// replaces it.
pub async fn handle_challenge_gate<R, B, F>(
    gate: &ChallengeGate,
    session: &OwnerSession,
    failure_handler: &F,
    request: &R,
    ctx: &RequestContext,
    builder: B,
) -> Result<(), B::Response>
where
    R: AuthRequest,
    B: AuthResponseBuilder,
    F: ChallengeFailureHandler,
{
    let owner = session.owner(request);
    match gate.check(owner.as_ref(), ctx).await {
        GateDecision::NotRequired | GateDecision::Passed(_) => Ok(()),
        GateDecision::Rejected(rejection) => Err(failure_handler.on_failure(builder, &rejection)),
        GateDecision::SecondCheckRequired { token } => {
            Err(builder.partial_content(serde_json::json!({ "token": token })))
        }
    }
}
