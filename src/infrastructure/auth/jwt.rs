//! Session token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::account::Account;
use crate::domain::DomainError;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// Create new claims for an account
    pub fn new(account: &Account, expiration_days: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::days(expiration_days as i64);

        Self {
            sub: account.id().as_str().to_string(),
            email: account.email().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Get the account ID from the claims
    pub fn account_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens; process-wide, no default in
    /// production deployments
    pub secret: String,
    /// Token lifetime in days
    pub expiration_days: u64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_days: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_days,
        }
    }
}

/// Trait for session token operations
pub trait SessionTokens: Send + Sync + Debug {
    /// Issue a signed session token for an account
    fn issue(&self, account: &Account) -> Result<String, DomainError>;

    /// Verify a session token and return its claims. Fails with
    /// `InvalidToken` on a bad signature, malformed input, or expiry.
    fn verify(&self, token: &str) -> Result<SessionClaims, DomainError>;
}

/// HS256 token service over a server-held secret
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiration_days", &self.config.expiration_days)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Create a new token service with the given configuration
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl SessionTokens for TokenService {
    fn issue(&self, account: &Account) -> Result<String, DomainError> {
        let claims = SessionClaims::new(account, self.config.expiration_days);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| DomainError::InvalidToken)?;

        Ok(token_data.claims)
    }
}
