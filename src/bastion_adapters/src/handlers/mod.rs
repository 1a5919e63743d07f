//! Framework-agnostic challenge and authorization handlers.
//!
//! These handlers contain the request logic without any framework dependencies.
//! Framework-specific routes and middleware extract data from requests, call
//! these handlers, and convert the results back to framework responses.

pub mod challenge_gate;
pub mod issue_code;
pub mod owner_session;
pub mod slider_check;
pub mod uri_authorize;

#[cfg(test)]
pub(crate) mod test_support;

pub use challenge_gate::handle_challenge_gate;
pub use issue_code::handle_issue_code;
pub use owner_session::OwnerSession;
pub use slider_check::handle_slider_check;
pub use uri_authorize::handle_uri_authorize;
