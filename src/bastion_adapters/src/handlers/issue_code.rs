//! Framework-agnostic challenge issuing handler.

use std::str::FromStr;

use bastion_application::ProcessorRegistry;
use bastion_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, ChallengeFailureHandler,
    ChallengeRejection, CodeType, RequestContext,
};

use super::owner_session::OwnerSession;

/// Issue a challenge of the type named in the request path.
///
/// The owner key comes from the session cookie; clients without one get a
/// fresh key and the cookie that carries it. Failures are rendered by
/// `failure_handler`.
///
/// ```ignore
/// let (request, _) = AxumRequest(request).into_head();
/// handle_issue_code(state.registry(), &state.session, state.failure_handler.as_ref(),
///     &code_type, &request, &ctx, response_builder()).await
/// ```
#[tracing::instrument(name = "IssueCode", skip_all, fields(code_type = %code_type))]
pub async fn handle_issue_code<R, B, F>(
    registry: &ProcessorRegistry,
    session: &OwnerSession,
    failure_handler: &F,
    code_type: &str,
    request: &R,
    ctx: &RequestContext,
    builder: B,
) -> B::Response
where
    R: AuthRequest,
    B: AuthResponseBuilder,
    F: ChallengeFailureHandler,
{
    let Ok(code_type) = CodeType::from_str(code_type) else {
        return builder.not_found("unknown verification code type");
    };

    let (owner, set_cookie) = session.owner_or_new(request);
    let builder = match &set_cookie {
        Some(cookie) => builder.cookie(cookie),
        None => builder,
    };

    let issued = match registry.resolve(code_type) {
        Ok(processor) => processor.issue(&owner, ctx).await,
        Err(e) => Err(e),
    };

    match issued {
        Ok(payload) => match serde_json::to_value(&payload) {
            Ok(body) => builder.ok_json(body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize challenge payload");
                builder.internal_error("failed to issue verification code")
            }
        },
        Err(error) => {
            let rejection = ChallengeRejection::new(
                &error,
                Some(code_type),
                request.path(),
                request.remote_addr(),
            );
            tracing::warn!(kind = %rejection.kind, error = %error, "Failed to issue verification code");
            failure_handler.on_failure(builder, &rejection)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use bastion_application::{ChallengePolicy, DefaultCodeProcessor};
    use bastion_core::{ChallengeKey, ChallengeStore, JsonFailureHandler, OwnerKey};

    use super::*;
    use crate::{
        generators::{ImageCodeGenerator, SmsCodeGenerator},
        handlers::test_support::{MockRequest, MockResponseBuilder},
        persistence::HashMapChallengeStore,
    };

    fn registry(store: HashMapChallengeStore) -> ProcessorRegistry {
        let policy = ChallengePolicy::new(Duration::from_secs(300), Duration::from_millis(200));
        let sms = SmsCodeGenerator::new(6, "mobile", bastion_core::DEFAULT_MOBILE_PATTERN).unwrap();
        ProcessorRegistry::new()
            .with(Arc::new(DefaultCodeProcessor::new(
                store.clone(),
                ImageCodeGenerator::new(4, 270, 60),
                policy.clone(),
                "imageCode",
            )))
            .with(Arc::new(DefaultCodeProcessor::new(
                store,
                sms,
                policy,
                "smsCode",
            )))
    }

    #[tokio::test]
    async fn test_issues_image_and_sets_session_cookie() {
        let store = HashMapChallengeStore::new();
        let request = MockRequest::new("GET", "/code/image");

        let response = handle_issue_code(
            &registry(store.clone()),
            &OwnerSession::default(),
            &JsonFailureHandler,
            "image",
            &request,
            &RequestContext::new("GET", "/code/image"),
            MockResponseBuilder::default(),
        )
        .await;

        assert_eq!(response.status, 200);
        let body = response.body.as_ref().unwrap();
        assert_eq!(body["type"], "image");
        assert_eq!(body["expire_in"], 300);
        assert!(body["image"].as_str().is_some_and(|s| !s.is_empty()));

        let cookie = response.header("set-cookie").unwrap();
        let owner = cookie
            .strip_prefix("bastion_session=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let key = ChallengeKey::new(CodeType::Image, OwnerKey::parse(owner).unwrap());
        assert!(store.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_existing_session_gets_no_new_cookie() {
        let owner = OwnerKey::new();
        let request = MockRequest::new("GET", "/code/image")
            .with_cookie("bastion_session", owner.as_str());

        let response = handle_issue_code(
            &registry(HashMapChallengeStore::new()),
            &OwnerSession::default(),
            &JsonFailureHandler,
            "image",
            &request,
            &RequestContext::new("GET", "/code/image"),
            MockResponseBuilder::default(),
        )
        .await;

        assert_eq!(response.status, 200);
        assert!(response.header("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_unknown_type_is_not_found() {
        let response = handle_issue_code(
            &registry(HashMapChallengeStore::new()),
            &OwnerSession::default(),
            &JsonFailureHandler,
            "captcha",
            &MockRequest::new("GET", "/code/captcha"),
            &RequestContext::new("GET", "/code/captcha"),
            MockResponseBuilder::default(),
        )
        .await;
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_unregistered_type_is_unsupported() {
        let response = handle_issue_code(
            &registry(HashMapChallengeStore::new()),
            &OwnerSession::default(),
            &JsonFailureHandler,
            "slider",
            &MockRequest::new("GET", "/code/slider"),
            &RequestContext::new("GET", "/code/slider"),
            MockResponseBuilder::default(),
        )
        .await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body.unwrap()["code"], "unsupported");
    }

    #[tokio::test]
    async fn test_sms_without_mobile_is_malformed() {
        let response = handle_issue_code(
            &registry(HashMapChallengeStore::new()),
            &OwnerSession::default(),
            &JsonFailureHandler,
            "sms",
            &MockRequest::new("GET", "/code/sms"),
            &RequestContext::new("GET", "/code/sms"),
            MockResponseBuilder::default(),
        )
        .await;
        assert_eq!(response.status, 401);
        assert_eq!(response.body.unwrap()["code"], "malformed_input");
    }
}
