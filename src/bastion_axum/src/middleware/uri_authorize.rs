//! URI authorization as Axum middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use bastion_adapters::handlers;
use bastion_core::{ChallengeFailureHandler, PermissionTableProvider, Principal};

use crate::{adapters::response_builder, state::AuthorizeState};

/// Authorizes the request for the `Principal` an earlier authentication layer
/// stored in the request extensions.
pub async fn uri_authorize<P, F>(
    State(state): State<AuthorizeState<P, F>>,
    request: Request,
    next: Next,
) -> Response
where
    P: PermissionTableProvider + 'static,
    F: ChallengeFailureHandler,
{
    let principal = request.extensions().get::<Principal>().cloned();
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    let decision = handlers::handle_uri_authorize(
        &state.service,
        state.failure_handler.as_ref(),
        principal.as_ref(),
        &method,
        &path,
        response_builder(),
    )
    .await;

    match decision {
        Ok(()) => next.run(request).await,
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::get,
    };
    use bastion_adapters::persistence::StaticPermissionProvider;
    use bastion_application::UriAuthorizeService;
    use bastion_core::{JsonFailureHandler, MethodPermissions, PermissionTable};
    use tower::ServiceExt;

    use super::*;

    async fn authenticate(mut request: Request, next: Next) -> Response {
        if let Some(user) = request
            .headers()
            .get("x-user")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
        {
            let role = format!("ROLE_{}", user.to_uppercase());
            request
                .extensions_mut()
                .insert(Principal::new(user, [role]));
        }
        next.run(request).await
    }

    fn app() -> Router {
        let table = PermissionTable::default().with_grant("ROLE_ADMIN", "/user/**", ["list"]);
        let service = UriAuthorizeService::new(
            StaticPermissionProvider::new(Some(table)),
            MethodPermissions::default(),
            Duration::from_millis(200),
        );
        let state = AuthorizeState::new(Arc::new(service), JsonFailureHandler);

        Router::new()
            .route("/user/{id}", get(|| async { "ok" }).delete(|| async { "gone" }))
            .layer(from_fn_with_state(
                state,
                uri_authorize::<StaticPermissionProvider, JsonFailureHandler>,
            ))
            .layer(from_fn(authenticate))
    }

    async fn status(method: &str, user: Option<&str>) -> StatusCode {
        let mut request = HttpRequest::builder().method(method).uri("/user/7");
        if let Some(user) = user {
            request = request.header("x-user", user);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_permission_decides_access() {
        assert_eq!(status("GET", Some("admin")).await, StatusCode::OK);
        assert_eq!(status("DELETE", Some("admin")).await, StatusCode::FORBIDDEN);
        assert_eq!(status("GET", Some("guest")).await, StatusCode::FORBIDDEN);
        assert_eq!(status("GET", None).await, StatusCode::UNAUTHORIZED);
    }
}
