//! Infrastructure for the bastion engines: challenge generators, challenge
//! stores, delivery channels, permission providers, configuration and the
//! framework-agnostic HTTP handlers.

pub mod config;
pub mod generators;
pub mod handlers;
pub mod persistence;
pub mod sms;

// Re-export HTTP traits from bastion_core for convenience
pub use bastion_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, ChallengeFailureHandler,
    JsonFailureHandler,
};
