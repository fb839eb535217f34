//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountId};
use crate::domain::DomainError;

/// Repository trait for account storage
///
/// All operations are atomic with respect to a single record. `create`
/// must enforce email uniqueness inside the store, not via a separate
/// read-then-write from the caller.
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by email (case-insensitive, for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Get an account by a reset token. Returns `None` unless the token
    /// matches and its expiry is in the future - the expiry check is the
    /// store's responsibility so expired-but-matching records never leak.
    async fn get_by_reset_token(&self, token: &str) -> Result<Option<Account>, DomainError>;

    /// Get an account by its email-verification token
    async fn get_by_verification_token(&self, token: &str)
        -> Result<Option<Account>, DomainError>;

    /// Create a new account; fails with `Conflict` if the email is taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account; fails with `NotFound` if the id vanished
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
