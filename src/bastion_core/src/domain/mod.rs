pub mod authorize_error;
pub mod challenge;
pub mod challenge_error;
pub mod code_type;
pub mod delivery;
pub mod owner_key;
pub mod permission;
pub mod principal;
pub mod request_context;
