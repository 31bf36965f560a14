//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sellerdesk_core::error::CoreError;
use sellerdesk_core::roles::role_for;
use sellerdesk_core::status::SellerStatus;
use sellerdesk_core::types::DbId;
use sellerdesk_db::SellerWorkflow;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub seller_id: DbId,
    pub role: &'static str,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid account or password".into(),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with account + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let credentials = SellerWorkflow::find_credentials(&state.pool, input.account.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &credentials.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    if credentials.status_id == SellerStatus::Closed.id() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Seller account is closed".into(),
        )));
    }

    let role = role_for(credentials.is_master);
    let access_token = generate_access_token(credentials.seller_id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(seller_id = credentials.seller_id, role, "Seller signed in");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        seller_id: credentials.seller_id,
        role,
    }))
}
