//! Axum-specific authorization decision route.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bastion_core::{
    AuthorizeDenial, ChallengeFailureHandler, PermissionTableProvider, Principal,
};
use serde::Deserialize;

use crate::{adapters::response_builder, state::AuthorizeState};

#[derive(Debug, Deserialize)]
pub struct AuthorizeCheckRequest {
    pub principal: Principal,
    pub method: String,
    pub uri: String,
}

/// `POST /authorize` answers `{"granted": bool}` for a principal, method and
/// URI, for gateways that delegate the decision.
#[tracing::instrument(name = "AuthorizeCheck", skip_all, fields(uri = %request.uri))]
pub async fn authorize_check<P, F>(
    State(state): State<AuthorizeState<P, F>>,
    Json(request): Json<AuthorizeCheckRequest>,
) -> Response
where
    P: PermissionTableProvider + 'static,
    F: ChallengeFailureHandler,
{
    match state
        .service
        .has_request_permission(&request.principal, &request.method, &request.uri)
        .await
    {
        Ok(granted) => (
            StatusCode::OK,
            Json(serde_json::json!({ "granted": granted })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(error = %error, "Authorization could not be decided");
            state
                .failure_handler
                .on_denied(response_builder(), AuthorizeDenial::from(&error))
        }
    }
}
