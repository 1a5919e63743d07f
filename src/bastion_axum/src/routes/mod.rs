//! Axum-specific routes.
//!
//! These routes use Axum's extractors to get data from requests, call the
//! framework-agnostic handlers, and return Axum responses.

pub mod authorize_check;
pub mod issue_code;
pub mod slider_check;

pub use authorize_check::authorize_check;
pub use issue_code::issue_code;
pub use slider_check::slider_check;
