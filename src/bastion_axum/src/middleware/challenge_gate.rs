//! Verification code gate as Axum middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bastion_adapters::handlers;
use bastion_core::ChallengeFailureHandler;

use crate::{adapters::response_builder, context::BufferedRequest, state::ChallengeState};

/// Runs guarded requests through the challenge gate.
///
/// Requests the classifier does not guard pass untouched; guarded ones are
/// buffered so the answer fields can be read, then rebuilt for `next`.
///
/// ```ignore
/// let app = Router::new()
///     .route("/authentication/form", post(login))
///     .layer(from_fn_with_state(challenge_state, challenge_gate::<JsonFailureHandler>));
/// ```
pub async fn challenge_gate<F>(
    State(state): State<ChallengeState<F>>,
    request: Request,
    next: Next,
) -> Response
where
    F: ChallengeFailureHandler,
{
    let guarded = state
        .gate
        .classifier()
        .classify(request.method().as_str(), request.uri().path())
        .is_some();
    if !guarded {
        return next.run(request).await;
    }

    let buffered = match BufferedRequest::read(request).await {
        Ok(buffered) => buffered,
        Err(e) => return e.into_response(),
    };

    let decision = handlers::handle_challenge_gate(
        &state.gate,
        &state.session,
        state.failure_handler.as_ref(),
        &buffered.head,
        &buffered.context,
        response_builder(),
    )
    .await;

    match decision {
        Ok(()) => next.run(buffered.into_request()).await,
        Err(response) => response,
    }
}
