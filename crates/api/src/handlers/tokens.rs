//! Handlers for the `/tokens` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskdeck_core::types::Timestamp;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /tokens/renew_access`.
#[derive(Debug, Deserialize)]
pub struct RenewAccessRequest {
    pub refresh_token: String,
}

/// Response body for `POST /tokens/renew_access`.
#[derive(Debug, Serialize)]
pub struct RenewAccessResponse {
    pub access_token: String,
    pub access_token_expires_at: Timestamp,
}

/// POST /tokens/renew_access
///
/// Exchange a valid refresh token for a fresh access token. The refresh
/// token itself is not rotated.
pub async fn renew_access(
    State(state): State<AppState>,
    Json(input): Json<RenewAccessRequest>,
) -> AppResult<Json<RenewAccessResponse>> {
    if input.refresh_token.is_empty() {
        return Err(AppError::BadRequest("missing refresh token".to_string()));
    }

    let renewed = state.tokens.renew_access(&input.refresh_token).await?;

    Ok(Json(RenewAccessResponse {
        access_token: renewed.access_token,
        access_token_expires_at: renewed.access_token_expires_at,
    }))
}
