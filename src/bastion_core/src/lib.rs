pub mod ant_path;
pub mod domain;
pub mod failure_handler;
pub mod http_abstraction;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    authorize_error::{AuthorizeDenial, AuthorizeError},
    challenge::{
        Challenge, ChallengeBuildError, ChallengeCode, ChallengeSecret, Point, SLIDER_TOLERANCE,
        SliderTarget, TRACK_TOLERANCE, TrackPath,
    },
    challenge_error::{ChallengeError, ChallengeRejection, FailureKind},
    code_type::{CodeType, CodeTypeError},
    delivery::{Artifact, DEFAULT_MOBILE_PATTERN, DeliveryPayload, Mobile, MobileError, OutOfBandMessage},
    owner_key::{OwnerKey, OwnerKeyError},
    permission::{MethodPermissions, PermissionTable, ResolvedPermissionMap, union_of_roles},
    principal::{Principal, ROLE_PREFIX, SCOPE_PREFIX, TENANT_PREFIX},
    request_context::RequestContext,
};

pub use ports::{
    repositories::{ChallengeKey, ChallengeStore, ChallengeStoreError},
    services::{DeliveryChannel, DeliveryError, PermissionTableError, PermissionTableProvider},
};

pub use strategies::{
    code_generator::{CodeGenerator, GenerateError, GeneratedChallenge},
    code_processor::{CodeProcessor, ValidationOutcome},
};

pub use ant_path::{AntPattern, ant_match, is_pattern, normalize_path};
pub use failure_handler::{ChallengeFailureHandler, JsonFailureHandler};
pub use http_abstraction::{AuthRequest, AuthResponseBuilder, AuthResponseHelpers};
