mod challenge_service;
mod helpers;
mod tracing;

pub use challenge_service::ChallengeService;
pub use helpers::{
    ServiceError, build_authorize_service, build_challenge_gate, build_delivery_channel,
    configure_redis, get_redis_client,
};

// Re-export commonly used types
pub use bastion_core::{ChallengeStore, DeliveryChannel, PermissionTableProvider};
