//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;
use crate::infrastructure::account::{
    AccountService, OnboardingRequest, PasswordHasher, SignupRequest,
};
use crate::infrastructure::auth::SessionTokens;
use crate::infrastructure::news::NewsService;
use crate::infrastructure::weather::WeatherService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub token_service: Arc<dyn SessionTokens>,
    pub weather_service: Arc<WeatherService>,
    pub news_service: Arc<NewsService>,
}

/// Trait for account lifecycle operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<Account, DomainError>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, DomainError>;
    async fn verify_email(&self, token: &str) -> Result<Account, DomainError>;
    async fn forgot_password(&self, email: &str) -> Result<(), DomainError>;
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError>;
    async fn complete_onboarding(
        &self,
        id: &AccountId,
        request: OnboardingRequest,
    ) -> Result<Account, DomainError>;
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> AccountServiceTrait for AccountService<R, H>
where
    R: AccountRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn signup(&self, request: SignupRequest) -> Result<Account, DomainError> {
        AccountService::signup(self, request).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        AccountService::authenticate(self, email, password).await
    }

    async fn verify_email(&self, token: &str) -> Result<Account, DomainError> {
        AccountService::verify_email(self, token).await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        AccountService::forgot_password(self, email).await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError> {
        AccountService::reset_password(self, token, new_password).await
    }

    async fn complete_onboarding(
        &self,
        id: &AccountId,
        request: OnboardingRequest,
    ) -> Result<Account, DomainError> {
        AccountService::complete_onboarding(self, id, request).await
    }

    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        AccountService::get(self, id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        token_service: Arc<dyn SessionTokens>,
        weather_service: Arc<WeatherService>,
        news_service: Arc<NewsService>,
    ) -> Self {
        Self {
            account_service,
            token_service,
            weather_service,
            news_service,
        }
    }
}
