//! Authenticated account endpoints

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::api::auth::AccountResponse;
use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::account::OnboardingRequest;

/// Create the user router
pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/onboarding", post(onboarding))
}

/// Onboarding request body
#[derive(Debug, Deserialize)]
pub struct OnboardingBody {
    pub state: String,
    pub district: String,
    pub crops: Vec<String>,
}

/// Onboarding response
#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub message: String,
    pub user: AccountResponse,
}

/// Record location and crops for the signed-in account
///
/// POST /api/user/onboarding
///
/// Marks the account onboarded; the dashboard is gated on this flag.
pub async fn onboarding(
    State(app_state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Json(body): Json<OnboardingBody>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let updated = app_state
        .account_service
        .complete_onboarding(
            account.id(),
            OnboardingRequest {
                state: body.state,
                district: body.district,
                crops: body.crops,
            },
        )
        .await?;

    Ok(Json(OnboardingResponse {
        message: "Onboarding completed successfully".to_string(),
        user: AccountResponse::from_account(&updated),
    }))
}
