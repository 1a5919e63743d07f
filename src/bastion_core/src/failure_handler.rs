//! Translation of challenge and authorization failures into responses.

use serde_json::json;

use crate::{
    domain::{
        authorize_error::AuthorizeDenial,
        challenge_error::{ChallengeRejection, FailureKind},
    },
    http_abstraction::AuthResponseBuilder,
};

/// Renders the client-visible response for a refused request.
///
/// The challenge gate and the authorization filter are the only callers;
/// nothing past them sees internal failure kinds.
pub trait ChallengeFailureHandler: Send + Sync + 'static {
    fn on_failure<B: AuthResponseBuilder>(
        &self,
        builder: B,
        rejection: &ChallengeRejection,
    ) -> B::Response;

    fn on_denied<B: AuthResponseBuilder>(&self, builder: B, denial: AuthorizeDenial)
    -> B::Response;
}

/// Responds with `{"error": <message>, "code": <kind>}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFailureHandler;

impl JsonFailureHandler {
    fn challenge_status(kind: FailureKind) -> u16 {
        match kind {
            FailureKind::StoreUnavailable => 503,
            FailureKind::Unsupported | FailureKind::GenerationFailed => 500,
            FailureKind::DeliveryFailed => 502,
            FailureKind::NotFound
            | FailureKind::Expired
            | FailureKind::Mismatch
            | FailureKind::MalformedInput => 401,
        }
    }

    fn denial_status(denial: AuthorizeDenial) -> u16 {
        match denial {
            AuthorizeDenial::Unauthenticated => 401,
            AuthorizeDenial::Forbidden => 403,
            AuthorizeDenial::Unconfigured => 500,
            AuthorizeDenial::StoreUnavailable => 503,
        }
    }
}

impl ChallengeFailureHandler for JsonFailureHandler {
    fn on_failure<B: AuthResponseBuilder>(
        &self,
        builder: B,
        rejection: &ChallengeRejection,
    ) -> B::Response {
        // NotFound and Expired share a code as well as a message.
        let code = match rejection.kind {
            FailureKind::NotFound => FailureKind::Expired,
            other => other,
        };
        builder
            .status(Self::challenge_status(rejection.kind))
            .json_body(json!({
                "error": rejection.client_message(),
                "code": code.as_str(),
            }))
            .build()
    }

    fn on_denied<B: AuthResponseBuilder>(
        &self,
        builder: B,
        denial: AuthorizeDenial,
    ) -> B::Response {
        builder
            .status(Self::denial_status(denial))
            .json_body(json!({
                "error": denial.client_message(),
                "code": denial.as_str(),
            }))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{challenge_error::ChallengeError, code_type::CodeType};

    #[derive(Default)]
    struct RecordingBuilder {
        status: u16,
        body: Option<serde_json::Value>,
    }

    impl AuthResponseBuilder for RecordingBuilder {
        type Response = (u16, serde_json::Value);

        fn status(mut self, code: u16) -> Self {
            self.status = code;
            self
        }

        fn header(self, _name: &str, _value: &str) -> Self {
            self
        }

        fn json_body(mut self, body: serde_json::Value) -> Self {
            self.body = Some(body);
            self
        }

        fn build(self) -> Self::Response {
            (self.status, self.body.unwrap_or_default())
        }
    }

    fn rejection(error: ChallengeError) -> ChallengeRejection {
        ChallengeRejection::new(&error, Some(CodeType::Image), "/login", None)
    }

    #[test]
    fn test_not_found_renders_as_expired() {
        let handler = JsonFailureHandler;
        let not_found = handler.on_failure(RecordingBuilder::default(), &rejection(ChallengeError::NotFound));
        let expired = handler.on_failure(RecordingBuilder::default(), &rejection(ChallengeError::Expired));

        assert_eq!(not_found, expired);
        assert_eq!(not_found.0, 401);
        assert_eq!(not_found.1["code"], "expired");
    }

    #[test]
    fn test_store_outage_is_not_a_client_error() {
        let (status, body) = JsonFailureHandler.on_failure(
            RecordingBuilder::default(),
            &rejection(ChallengeError::StoreUnavailable("timeout".to_string())),
        );
        assert_eq!(status, 503);
        assert_eq!(body["code"], "store_unavailable");
        assert!(!body["error"].as_str().unwrap().contains("timeout"));
    }

    #[test]
    fn test_denials() {
        let handler = JsonFailureHandler;
        assert_eq!(
            handler.on_denied(RecordingBuilder::default(), AuthorizeDenial::Forbidden).0,
            403
        );
        assert_eq!(
            handler.on_denied(RecordingBuilder::default(), AuthorizeDenial::Unauthenticated).0,
            401
        );
        let (status, body) =
            handler.on_denied(RecordingBuilder::default(), AuthorizeDenial::Unconfigured);
        assert_eq!(status, 500);
        assert_eq!(body["code"], "unconfigured");
    }
}
