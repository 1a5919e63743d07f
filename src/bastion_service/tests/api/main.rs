mod authorize;
mod helpers;
mod issue_code;
mod redis_store;
mod slider;
mod sms;
