//! In-memory account repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

/// Records and the email index behind one lock. A single guard covers
/// the uniqueness check-and-insert in `create`, and no operation ever
/// holds two locks, so lock ordering cannot invert.
#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<String, Account>,
    /// Lowercased email -> account ID
    email_index: HashMap<String, String>,
}

/// In-memory implementation of AccountRepository
#[derive(Debug)]
pub struct InMemoryAccountRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let store = self.store.read().await;
        Ok(store.accounts.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let email = email.trim().to_lowercase();
        let store = self.store.read().await;

        Ok(store
            .email_index
            .get(&email)
            .and_then(|account_id| store.accounts.get(account_id))
            .cloned())
    }

    async fn get_by_reset_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        let store = self.store.read().await;

        let account = store
            .accounts
            .values()
            .find(|a| a.reset_token() == Some(token))
            .cloned();

        // An expired token is equivalent to no token
        match account {
            Some(a) if a.reset_token_expiry().is_some_and(|exp| exp > Utc::now()) => Ok(Some(a)),
            _ => Ok(None),
        }
    }

    async fn get_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .accounts
            .values()
            .find(|a| a.verification_token() == Some(token))
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut store = self.store.write().await;

        let id = account.id().as_str().to_string();
        let email = account.email().to_string();

        if store.email_index.contains_key(&email) {
            return Err(DomainError::conflict("User already exists with this email"));
        }

        store.email_index.insert(email, id.clone());
        store.accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut store = self.store.write().await;

        let id = account.id().as_str().to_string();

        if !store.accounts.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            )));
        }

        store.accounts.insert(id, account.clone());

        Ok(account.clone())
    }
}
