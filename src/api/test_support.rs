//! Shared fixtures for handler tests

use std::sync::Arc;

use crate::api::state::AppState;
use crate::infrastructure::account::{
    AccountService, Argon2Hasher, InMemoryAccountRepository,
};
use crate::infrastructure::auth::{TokenConfig, TokenService};
use crate::infrastructure::news::{NewsConfig, NewsService};
use crate::infrastructure::notifier::mock::RecordingNotifier;
use crate::infrastructure::weather::{WeatherConfig, WeatherService};

/// Fully wired in-memory state. The weather and news services carry no
/// API keys, so their lookups degrade instead of reaching the network.
pub fn test_state() -> AppState {
    let repository = Arc::new(InMemoryAccountRepository::new());
    let hasher = Arc::new(Argon2Hasher::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let account_service = Arc::new(AccountService::new(
        repository,
        hasher,
        notifier,
        "http://localhost:8080",
    ));
    let token_service = Arc::new(TokenService::new(TokenConfig::new(
        "test-secret-key-12345",
        7,
    )));

    AppState::new(
        account_service,
        token_service,
        Arc::new(WeatherService::new(WeatherConfig::default())),
        Arc::new(NewsService::new(NewsConfig::default())),
    )
}
