//! Account lifecycle service
//!
//! Orchestrates signup, login, email verification, forgot/reset password,
//! and onboarding completion over the repository, hasher, and notifier.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng, RngCore};
use tracing::warn;

use crate::domain::account::{
    validate_email, validate_name, validate_onboarding, validate_password, Account, AccountId,
    AccountRepository, Location,
};
use crate::domain::DomainError;
use crate::infrastructure::notifier::Notifier;

use super::password::PasswordHasher;

/// Reset tokens stay valid for one hour after issuance
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Length of the opaque email-verification token
const VERIFICATION_TOKEN_LENGTH: usize = 20;

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for completing onboarding
#[derive(Debug, Clone)]
pub struct OnboardingRequest {
    pub state: String,
    pub district: String,
    pub crops: Vec<String>,
}

/// Account lifecycle service
#[derive(Debug)]
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    notifier: Arc<dyn Notifier>,
    /// Base URL the reset link points at, e.g. `http://localhost:8080`
    public_base_url: String,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    /// Create a new account service
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<H>,
        notifier: Arc<dyn Notifier>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            hasher,
            notifier,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new unverified account
    ///
    /// Email uniqueness is enforced by the repository's `create`, so two
    /// concurrent signups for the same email cannot both succeed.
    pub async fn signup(&self, request: SignupRequest) -> Result<Account, DomainError> {
        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;
        let verification_token = generate_verification_token();

        let account = Account::new(
            request.name.trim(),
            &request.email,
            password_hash,
            verification_token,
        );

        self.repository.create(account).await
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password produce the same error so callers
    /// cannot enumerate accounts.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, DomainError> {
        let account = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.hasher.verify(password, account.password_hash()) {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Consume a verification token, marking the account verified
    ///
    /// A replayed token fails the same way as an unknown one: the first
    /// use cleared it, so the lookup no longer matches.
    pub async fn verify_email(&self, token: &str) -> Result<Account, DomainError> {
        if token.is_empty() {
            return Err(DomainError::InvalidToken);
        }

        let mut account = self
            .repository
            .get_by_verification_token(token)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        account.mark_verified();
        self.repository.update(&account).await
    }

    /// Arm a password reset: generate a token valid for one hour and
    /// dispatch the reset link out of band
    ///
    /// Revealing non-existence via `NotFound` is a deliberate product
    /// choice carried over from the original flow.
    pub async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut account = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("No account found with this email"))?;

        let token = generate_reset_token();
        let expiry = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        account.set_reset_token(&token, expiry);
        self.repository.update(&account).await?;

        // Fire-and-forget: a delivery failure must not fail the operation
        let link = format!("{}/reset-password?token={}", self.public_base_url, token);
        if let Err(e) = self.notifier.send_reset_link(account.email(), &link).await {
            warn!(email = account.email(), error = %e, "reset link delivery failed");
        }

        Ok(())
    }

    /// Consume a reset token and replace the password
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        // The store only returns a match whose expiry is in the future
        let mut account = self
            .repository
            .get_by_reset_token(token)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        let new_hash = self.hasher.hash(new_password)?;
        account.set_password_hash(new_hash);

        self.repository.update(&account).await?;
        Ok(())
    }

    /// Record onboarding completion for an authenticated account
    pub async fn complete_onboarding(
        &self,
        id: &AccountId,
        request: OnboardingRequest,
    ) -> Result<Account, DomainError> {
        validate_onboarding(&request.state, &request.district, &request.crops)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut account = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        account.complete_onboarding(
            Location {
                state: request.state.trim().to_string(),
                district: request.district.trim().to_string(),
            },
            request
                .crops
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        );

        self.repository.update(&account).await
    }

    /// Get an account by ID
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        self.repository.get(id).await
    }
}

/// Opaque token proving control of the registered email
fn generate_verification_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Opaque token authorizing one password change: 32 random bytes, hex
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
