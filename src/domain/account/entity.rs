//! Account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account identifier - a UUID assigned at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (e.g. from verified token claims)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Farm location captured during onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub district: String,
}

/// Account entity, the sole durable record of the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable after creation
    id: AccountId,
    /// Login email, stored lowercased and trimmed; immutable post-creation
    email: String,
    /// Display name
    name: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Set true exactly once by the verification flow
    is_verified: bool,
    /// Present only while unverified; cleared on successful verification
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_token: Option<String>,
    /// Present only between a forgot-password request and its consumption
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_token_expiry: Option<DateTime<Utc>>,
    /// Set true exactly once by onboarding completion
    is_onboarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    crops: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unverified, not-yet-onboarded account
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        verification_token: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: AccountId::generate(),
            email: email.into().trim().to_lowercase(),
            name: name.into(),
            password_hash: password_hash.into(),
            is_verified: false,
            verification_token: Some(verification_token.into()),
            reset_token: None,
            reset_token_expiry: None,
            is_onboarded: false,
            location: None,
            crops: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn verification_token(&self) -> Option<&str> {
        self.verification_token.as_deref()
    }

    pub fn reset_token(&self) -> Option<&str> {
        self.reset_token.as_deref()
    }

    pub fn reset_token_expiry(&self) -> Option<DateTime<Utc>> {
        self.reset_token_expiry
    }

    pub fn is_onboarded(&self) -> bool {
        self.is_onboarded
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn crops(&self) -> &[String] {
        &self.crops
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Mark the email as verified and consume the verification token
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
        self.touch();
    }

    /// Arm a password reset with a token and its absolute expiry
    pub fn set_reset_token(&mut self, token: impl Into<String>, expiry: DateTime<Utc>) {
        self.reset_token = Some(token.into());
        self.reset_token_expiry = Some(expiry);
        self.touch();
    }

    /// Replace the password hash and consume any pending reset token
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.reset_token = None;
        self.reset_token_expiry = None;
        self.touch();
    }

    /// Record onboarding completion with location and crop selections
    pub fn complete_onboarding(&mut self, location: Location, crops: Vec<String>) {
        self.location = Some(location);
        self.crops = crops;
        self.is_onboarded = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account() -> Account {
        Account::new("Asha", "a@x.com", "hashed_password", "verify-token-1")
    }

    #[test]
    fn test_account_creation_defaults() {
        let account = create_test_account();

        assert_eq!(account.name(), "Asha");
        assert_eq!(account.email(), "a@x.com");
        assert!(!account.is_verified());
        assert!(!account.is_onboarded());
        assert_eq!(account.verification_token(), Some("verify-token-1"));
        assert!(account.reset_token().is_none());
        assert!(account.location().is_none());
        assert!(account.crops().is_empty());
    }

    #[test]
    fn test_email_normalized_on_creation() {
        let account = Account::new("Asha", "  Asha@Example.COM ", "hash", "tok");
        assert_eq!(account.email(), "asha@example.com");
    }

    #[test]
    fn test_mark_verified_consumes_token() {
        let mut account = create_test_account();

        account.mark_verified();

        assert!(account.is_verified());
        assert!(account.verification_token().is_none());
    }

    #[test]
    fn test_set_password_hash_clears_reset_token() {
        let mut account = create_test_account();

        account.set_reset_token("reset-1", Utc::now() + chrono::Duration::hours(1));
        assert!(account.reset_token().is_some());
        assert!(account.reset_token_expiry().is_some());

        account.set_password_hash("new_hash");

        assert_eq!(account.password_hash(), "new_hash");
        assert!(account.reset_token().is_none());
        assert!(account.reset_token_expiry().is_none());
    }

    #[test]
    fn test_complete_onboarding() {
        let mut account = create_test_account();

        account.complete_onboarding(
            Location {
                state: "Punjab".to_string(),
                district: "Ludhiana".to_string(),
            },
            vec!["Wheat".to_string()],
        );

        assert!(account.is_onboarded());
        assert_eq!(account.location().unwrap().district, "Ludhiana");
        assert_eq!(account.crops(), ["Wheat".to_string()]);
    }

    #[test]
    fn test_mutation_refreshes_updated_at() {
        let mut account = create_test_account();
        let original = account.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));
        account.mark_verified();

        assert!(account.updated_at() > original);
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let account = create_test_account();

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }
}
