//! Axum-specific challenge issuing route.

use axum::{
    extract::{Path, Request, State},
    response::Response,
};
use bastion_adapters::handlers;
use bastion_core::{AuthRequest, ChallengeFailureHandler, RequestContext};

use crate::{
    adapters::{AxumRequest, response_builder},
    state::ChallengeState,
};

/// `GET {prefix}/{type}`.
///
/// Inputs such as the mobile number come from the query string.
pub async fn issue_code<F>(
    State(state): State<ChallengeState<F>>,
    Path(code_type): Path<String>,
    request: Request,
) -> Response
where
    F: ChallengeFailureHandler,
{
    let (request, _) = AxumRequest(request).into_head();
    let mut ctx = RequestContext::new(request.method(), request.path())
        .with_remote_addr(request.remote_addr());
    if let Some(query) = request.0.uri().query() {
        let fields: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        ctx.extend_params(fields);
    }

    handlers::handle_issue_code(
        state.registry(),
        &state.session,
        state.failure_handler.as_ref(),
        &code_type,
        &request,
        &ctx,
        response_builder(),
    )
    .await
}
