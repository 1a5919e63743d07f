//! Framework-agnostic URI authorization filter.

use bastion_application::UriAuthorizeService;
use bastion_core::{
    AuthResponseBuilder, AuthorizeDenial, ChallengeFailureHandler, PermissionTableProvider,
    Principal,
};

/// Decide a request from its principal, method and path.
///
/// A missing principal is unauthenticated; a principal without the mapped
/// permission is forbidden. Engine errors are rendered as denials too.
#[tracing::instrument(name = "UriAuthorize", skip(service, failure_handler, principal, builder))]
pub async fn handle_uri_authorize<P, B, F>(
    service: &UriAuthorizeService<P>,
    failure_handler: &F,
    principal: Option<&Principal>,
    method: &str,
    path: &str,
    builder: B,
) -> Result<(), B::Response>
where
    P: PermissionTableProvider,
    B: AuthResponseBuilder,
    F: ChallengeFailureHandler,
{
    let Some(principal) = principal else {
        return Err(failure_handler.on_denied(builder, AuthorizeDenial::Unauthenticated));
    };

    match service.has_request_permission(principal, method, path).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::info!(principal = %principal.name(), "Access denied");
            Err(failure_handler.on_denied(builder, AuthorizeDenial::Forbidden))
        }
        Err(error) => {
            tracing::error!(error = %error, "Authorization could not be decided");
            Err(failure_handler.on_denied(builder, AuthorizeDenial::from(&error)))
        }
    }
}
