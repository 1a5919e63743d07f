mod snapshot;
pub mod uri_authorize_service;

pub use uri_authorize_service::{RefreshScope, UriAuthorizeService};
