//! Axum-specific slider first-check route.

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use bastion_adapters::handlers;
use bastion_core::ChallengeFailureHandler;

use crate::{adapters::response_builder, context::BufferedRequest, state::ChallengeState};

/// `POST {slider_check_url}` with `sliderToken`, `x` and `y` as form, JSON or
/// query fields.
pub async fn slider_check<F>(State(state): State<ChallengeState<F>>, request: Request) -> Response
where
    F: ChallengeFailureHandler,
{
    let buffered = match BufferedRequest::read(request).await {
        Ok(buffered) => buffered,
        Err(e) => return e.into_response(),
    };

    handlers::handle_slider_check(
        state.registry(),
        &state.session,
        state.failure_handler.as_ref(),
        &buffered.head,
        &buffered.context,
        response_builder(),
    )
    .await
}
