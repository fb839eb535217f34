//! Account input validation
//!
//! Every input-bearing operation validates shape before touching the
//! store; the first violated rule's message is what the caller sees.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during account input validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("Name must be at least {0} characters")]
    NameTooShort(usize),

    #[error("Name cannot be more than {0} characters")]
    NameTooLong(usize),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email is required")]
    EmptyEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password cannot be more than {0} characters")]
    PasswordTooLong(usize),

    #[error("State is required")]
    EmptyState,

    #[error("District is required")]
    EmptyDistrict,

    #[error("At least one crop is required")]
    NoCrops,
}

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 60;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Validate a display name (2..=60 characters after trimming)
pub fn validate_name(name: &str) -> Result<(), AccountValidationError> {
    let trimmed = name.trim();

    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(AccountValidationError::NameTooShort(MIN_NAME_LENGTH));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AccountValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> Result<(), AccountValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(AccountValidationError::EmptyEmail);
    }

    if !EMAIL_RE.is_match(trimmed) {
        return Err(AccountValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password (6..=128 characters)
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate onboarding input: non-empty state and district, at least one
/// non-blank crop
pub fn validate_onboarding(
    state: &str,
    district: &str,
    crops: &[String],
) -> Result<(), AccountValidationError> {
    if state.trim().is_empty() {
        return Err(AccountValidationError::EmptyState);
    }

    if district.trim().is_empty() {
        return Err(AccountValidationError::EmptyDistrict);
    }

    if crops.iter().filter(|c| !c.trim().is_empty()).count() == 0 {
        return Err(AccountValidationError::NoCrops);
    }

    Ok(())
}
