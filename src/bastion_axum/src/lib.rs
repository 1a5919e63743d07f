//! Axum integration for the bastion verification code and authorization
//! engines.
//!
//! A guarded request passes through [`middleware::challenge_gate`], which
//! buffers the body, builds a `RequestContext` and asks the gate for a
//! decision. Only a `Pass` reaches the inner handler, with the buffered body
//! restored. [`middleware::uri_authorize`] checks the `Principal` an earlier
//! layer put in the request extensions against the URI permission tables.
//!
//! ```text
//!   request ─▶ challenge_gate ─▶ uri_authorize ─▶ handler
//!                  │ reject         │ deny
//!                  ▼                ▼
//!            failure handler   failure handler
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use axum::{Router, middleware::from_fn_with_state, routing::{get, post}};
//! use bastion_axum::{ChallengeState, middleware, routes};
//!
//! let app = Router::new()
//!     .route("/code/{code_type}", get(routes::issue_code::<JsonFailureHandler>))
//!     .route("/slider/check", post(routes::slider_check::<JsonFailureHandler>))
//!     .route("/authentication/form", post(login))
//!     .layer(from_fn_with_state(state.clone(), middleware::challenge_gate::<JsonFailureHandler>))
//!     .with_state(state);
//! ```

pub mod adapters;
pub mod context;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export for convenience
pub use adapters::{AxumRequest, AxumResponseBuilder, response_builder};
pub use context::{BufferedRequest, ContextError};
pub use state::{AuthorizeState, ChallengeState};
