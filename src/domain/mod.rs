//! Domain types for the account lifecycle

pub mod account;
pub mod error;

pub use error::DomainError;
