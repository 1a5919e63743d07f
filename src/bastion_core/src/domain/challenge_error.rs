use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::code_type::CodeType;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("No challenge found")]
    NotFound,
    #[error("Challenge expired")]
    Expired,
    #[error("Verification code mismatch")]
    Mismatch,
    #[error("Missing or malformed field: {field}")]
    MalformedInput { field: String },
    #[error("Unsupported verification code type: {0}")]
    Unsupported(CodeType),
    #[error("Challenge store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("Challenge generation failed: {0}")]
    GenerationFailed(String),
}

impl PartialEq for ChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MalformedInput { field: a }, Self::MalformedInput { field: b }) => a == b,
            (Self::Unsupported(a), Self::Unsupported(b)) => a == b,
            _ => self.kind() == other.kind(),
        }
    }
}

impl ChallengeError {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound => FailureKind::NotFound,
            Self::Expired => FailureKind::Expired,
            Self::Mismatch => FailureKind::Mismatch,
            Self::MalformedInput { .. } => FailureKind::MalformedInput,
            Self::Unsupported(_) => FailureKind::Unsupported,
            Self::StoreUnavailable(_) => FailureKind::StoreUnavailable,
            Self::DeliveryFailed(_) => FailureKind::DeliveryFailed,
            Self::GenerationFailed(_) => FailureKind::GenerationFailed,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { field } => Some(field),
            _ => None,
        }
    }

    /// Message safe to show a client.
    pub fn client_message(&self) -> &'static str {
        self.kind().client_message()
    }
}

/// Failure category, stripped of internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Expired,
    Mismatch,
    MalformedInput,
    Unsupported,
    StoreUnavailable,
    DeliveryFailed,
    GenerationFailed,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Mismatch => "mismatch",
            Self::MalformedInput => "malformed_input",
            Self::Unsupported => "unsupported",
            Self::StoreUnavailable => "store_unavailable",
            Self::DeliveryFailed => "delivery_failed",
            Self::GenerationFailed => "generation_failed",
        }
    }

    /// A missing challenge reads as expired so clients cannot probe the store.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::NotFound | Self::Expired => "verification code expired",
            Self::Mismatch => "verification code mismatch",
            Self::MalformedInput => "verification code missing or malformed",
            Self::Unsupported => "unsupported verification code type",
            Self::StoreUnavailable => "verification service unavailable",
            Self::DeliveryFailed => "failed to deliver verification code",
            Self::GenerationFailed => "failed to generate verification code",
        }
    }

    /// Whether the client may fix this by requesting a new challenge.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::Expired | Self::Mismatch | Self::MalformedInput
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request as handed to the failure handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeRejection {
    pub kind: FailureKind,
    pub code_type: Option<CodeType>,
    pub uri: String,
    pub remote_addr: Option<String>,
    pub field: Option<String>,
}

impl ChallengeRejection {
    pub fn new(
        error: &ChallengeError,
        code_type: Option<CodeType>,
        uri: impl Into<String>,
        remote_addr: Option<String>,
    ) -> Self {
        Self {
            kind: error.kind(),
            code_type,
            uri: uri.into(),
            remote_addr,
            field: error.field().map(str::to_string),
        }
    }

    pub fn client_message(&self) -> &'static str {
        self.kind.client_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_expired_look_the_same() {
        assert_eq!(
            ChallengeError::NotFound.client_message(),
            ChallengeError::Expired.client_message()
        );
        assert_ne!(
            ChallengeError::NotFound.client_message(),
            ChallengeError::Mismatch.client_message()
        );
    }

    #[test]
    fn test_rejection_carries_field() {
        let rejection = ChallengeRejection::new(
            &ChallengeError::malformed("x"),
            Some(CodeType::Slider),
            "/login",
            Some("10.0.0.1".to_string()),
        );

        assert_eq!(rejection.kind, FailureKind::MalformedInput);
        assert_eq!(rejection.field.as_deref(), Some("x"));
        assert!(rejection.kind.is_client_error());
    }

    #[test]
    fn test_store_failures_are_not_client_errors() {
        let error = ChallengeError::StoreUnavailable("timeout".to_string());
        assert!(!error.kind().is_client_error());
        assert_eq!(error, ChallengeError::StoreUnavailable("other".to_string()));
    }
}
