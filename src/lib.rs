//! Farmdesk API
//!
//! Account lifecycle (signup, email verification, login, password reset,
//! onboarding) plus cached weather and agricultural-news lookups for the
//! farmer dashboard.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use api::state::AppState;
use infrastructure::account::{AccountService, Argon2Hasher, InMemoryAccountRepository};
use infrastructure::auth::{TokenConfig, TokenService};
use infrastructure::news::{NewsConfig, NewsService};
use infrastructure::notifier::LogNotifier;
use infrastructure::weather::{WeatherConfig, WeatherService};

/// Create the application state with all services initialized
///
/// Fails when no JWT secret is configured; the server must not start
/// with an unsigned session scheme.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .context("auth.jwt_secret is not configured (set APP__AUTH__JWT_SECRET)")?;

    let repository = Arc::new(InMemoryAccountRepository::new());
    let hasher = Arc::new(Argon2Hasher::new());
    let notifier = Arc::new(LogNotifier::new());

    let account_service = Arc::new(AccountService::new(
        repository,
        hasher,
        notifier,
        config.server.public_url.clone(),
    ));

    let token_service = Arc::new(TokenService::new(TokenConfig::new(
        jwt_secret,
        config.auth.token_expiration_days,
    )));

    let weather_defaults = WeatherConfig::default();
    let weather_service = Arc::new(WeatherService::new(WeatherConfig {
        api_key: config.weather.api_key.clone(),
        base_url: config
            .weather
            .base_url
            .clone()
            .unwrap_or(weather_defaults.base_url),
        cache_ttl: config
            .weather
            .cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(weather_defaults.cache_ttl),
    }));

    let news_defaults = NewsConfig::default();
    let news_service = Arc::new(NewsService::new(NewsConfig {
        api_key: config.news.api_key.clone(),
        base_url: config.news.base_url.clone().unwrap_or(news_defaults.base_url),
        cache_ttl: config
            .news
            .cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(news_defaults.cache_ttl),
    }));

    Ok(AppState::new(
        account_service,
        token_service,
        weather_service,
        news_service,
    ))
}
