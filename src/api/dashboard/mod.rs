//! Dashboard data endpoints
//!
//! Weather and news lookups for the signed-in account. Both endpoints
//! answer 200 with an error field in the payload when an upstream is
//! unavailable, so the client can still render the rest of the page.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::news::NewsFeed;
use crate::infrastructure::weather::WeatherLookup;

/// Create the dashboard router
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather))
        .route("/news", get(news))
}

/// Weather query parameters
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

/// Current conditions for a district
///
/// GET /api/weather?district=&state=&refresh=
///
/// Falls back to the account's onboarded location when the query
/// carries none.
pub async fn weather(
    State(app_state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherLookup>, ApiError> {
    let stored = account.location();
    let district = params
        .district
        .as_deref()
        .or(stored.map(|l| l.district.as_str()))
        .unwrap_or_default();
    let state = params
        .state
        .as_deref()
        .or(stored.map(|l| l.state.as_str()))
        .unwrap_or_default();

    let lookup = app_state
        .weather_service
        .current_conditions(district, state, params.refresh)
        .await?;

    Ok(Json(lookup))
}

/// News query parameters
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    /// Crop names joined by " OR "
    #[serde(default)]
    pub crops: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

/// Agricultural news feed for the account's crops
///
/// GET /api/news?crops=&state=&refresh=
pub async fn news(
    State(app_state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsFeed>, ApiError> {
    let crops = match params.crops {
        Some(crops) => crops,
        None => account.crops().join(" OR "),
    };
    let state = params
        .state
        .as_deref()
        .or(account.location().map(|l| l.state.as_str()))
        .unwrap_or_default()
        .to_string();

    let feed = app_state
        .news_service
        .feed(&crops, &state, params.refresh)
        .await?;

    Ok(Json(feed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;
    use crate::infrastructure::account::{OnboardingRequest, SignupRequest};
    use axum::http::StatusCode;

    async fn onboarded_account(state: &AppState) -> crate::domain::account::Account {
        let account = state
            .account_service
            .signup(SignupRequest {
                name: "Carol".to_string(),
                email: "carol@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        state
            .account_service
            .complete_onboarding(
                account.id(),
                OnboardingRequest {
                    state: "Punjab".to_string(),
                    district: "Ludhiana".to_string(),
                    crops: vec!["Wheat".to_string()],
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_weather_requires_district() {
        let state = test_state();
        let account = state
            .account_service
            .signup(SignupRequest {
                name: "Dan".to_string(),
                email: "dan@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        // Not onboarded and no query params, so there is no district
        let err = weather(
            State(state.clone()),
            RequireAccount(account),
            Query(WeatherParams::default()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_weather_falls_back_to_onboarded_location() {
        let state = test_state();
        let account = onboarded_account(&state).await;

        // No API key configured in tests, so the lookup degrades
        let Json(lookup) = weather(
            State(state.clone()),
            RequireAccount(account),
            Query(WeatherParams::default()),
        )
        .await
        .unwrap();

        match lookup {
            WeatherLookup::Failed { location, .. } => {
                assert!(location.contains("Ludhiana"));
            }
            WeatherLookup::Report(_) => panic!("expected a degraded lookup"),
        }
    }

    #[tokio::test]
    async fn test_news_degrades_without_key() {
        let state = test_state();
        let account = onboarded_account(&state).await;

        let Json(feed) = news(
            State(state.clone()),
            RequireAccount(account),
            Query(NewsParams::default()),
        )
        .await
        .unwrap();

        assert!(feed.articles.is_empty());
        assert!(feed.error.is_some());
        assert_eq!(feed.crops_searched, vec!["Wheat"]);
    }
}
