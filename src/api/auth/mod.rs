//! Authentication API endpoints
//!
//! Signup, login, email verification and the password reset flow.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::{Account, Location};
use crate::infrastructure::account::SignupRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify", get(verify))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// Account payload (safe to expose)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub is_onboarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crops: Vec<String>,
}

impl AccountResponse {
    pub(crate) fn from_account(account: &Account) -> Self {
        Self {
            id: account.id().as_str().to_string(),
            name: account.name().to_string(),
            email: account.email().to_string(),
            is_verified: account.is_verified(),
            is_onboarded: account.is_onboarded(),
            location: account.location().cloned(),
            crops: account.crops().to_vec(),
        }
    }
}

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Session response carrying a fresh token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: AccountResponse,
}

/// Register a new account
///
/// POST /api/auth/signup
///
/// Returns 201 with a session token. The account starts unverified;
/// a verification token is minted at creation time.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let account = state
        .account_service
        .signup(SignupRequest {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;

    let token = state.token_service.issue(&account)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Account created successfully".to_string(),
            token,
            user: AccountResponse::from_account(&account),
        }),
    ))
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Login with email and password
///
/// POST /api/auth/login
///
/// Returns a session token. Unknown email and wrong password fail
/// identically.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    let account = state
        .account_service
        .authenticate(&body.email, &body.password)
        .await?;

    let token = state.token_service.issue(&account)?;

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        token,
        user: AccountResponse::from_account(&account),
    }))
}

/// Verification query parameters
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(default)]
    pub token: String,
}

/// Verify an email address from the emailed link
///
/// GET /api/auth/verify?token=...
///
/// Redirects to the login page on success so the link works from a
/// mail client.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Redirect, ApiError> {
    state.account_service.verify_email(&params.token).await?;

    Ok(Redirect::to("/login?verified=true"))
}

/// Forgot-password request body
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
    pub email: String,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Start the password reset flow
///
/// POST /api/auth/forgot-password
///
/// Mints a reset token and sends the reset link to the account's
/// email. Unknown emails get a 404.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.account_service.forgot_password(&body.email).await?;

    Ok(Json(MessageResponse {
        message: "Password reset link sent to your email".to_string(),
    }))
}

/// Reset-password request body
#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub token: String,
    pub password: String,
}

/// Complete the password reset flow
///
/// POST /api/auth/reset-password
///
/// Consumes the reset token and installs the new password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .account_service
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful".to_string(),
    }))
}
