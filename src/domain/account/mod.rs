//! Account domain
//!
//! Domain types and traits for the account lifecycle: the account
//! entity, input validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountId, Location};
pub use repository::AccountRepository;
pub use validation::{
    validate_email, validate_name, validate_onboarding, validate_password,
    AccountValidationError,
};
