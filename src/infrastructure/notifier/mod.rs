//! Out-of-band notification dispatch
//!
//! Delivery is best-effort from the caller's perspective: a failed
//! dispatch is logged, never surfaced as an operation failure.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for dispatching account notifications
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Deliver a password-reset link to the given address
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), DomainError>;
}

/// Notifier that writes messages to the log instead of sending email
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_reset_link(&self, email: &str, link: &str) -> Result<(), DomainError> {
        tracing::info!(email, link, "password reset link issued");
        Ok(())
    }
}
