//! API middleware

pub mod account_auth;

pub use account_auth::{extract_bearer_token, RequireAccount};
