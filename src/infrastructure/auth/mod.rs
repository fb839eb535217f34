//! Session token infrastructure

mod jwt;

pub use jwt::{SessionClaims, SessionTokens, TokenConfig, TokenService};
