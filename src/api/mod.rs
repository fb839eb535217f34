//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod user;

#[cfg(test)]
pub mod test_support;

pub use middleware::RequireAccount;
pub use router::{create_router, create_router_with_state};
pub use state::AppState;
