//! Axum middleware for the challenge gate and URI authorization.

pub mod challenge_gate;
pub mod uri_authorize;

pub use challenge_gate::challenge_gate;
pub use uri_authorize::uri_authorize;
