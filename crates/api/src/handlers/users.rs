//! Handlers for the `/user` resource (register, login, logout, password
//! reset) and the bearer-protected `GET /me`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskdeck_core::types::Timestamp;
use taskdeck_core::validation::{validate_email, validate_password};
use taskdeck_db::models::user::{User, UserResponse};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::{client_meta, MessageResponse};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::token::codec::TokenUser;
use crate::token::service::TokenPair;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /user`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.email.is_empty() || self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::BadRequest(
                "missing email, username or password fields".to_string(),
            ));
        }
        validate_password(&self.password).map_err(AppError::BadRequest)?;
        validate_email(&self.email).map_err(AppError::BadRequest)?;
        Ok(())
    }
}

/// Request body for `POST /user/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::BadRequest(
                "missing email or password fields".to_string(),
            ));
        }
        validate_password(&self.password).map_err(AppError::BadRequest)?;
        validate_email(&self.email).map_err(AppError::BadRequest)?;
        Ok(())
    }
}

/// Request body for `POST /user/logout`.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Request body for `POST /user/reset-password-request`.
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Request body for `POST /user/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Successful authentication response returned by register and login.
///
/// `session_id` is the refresh token's payload UUID. The embedded user
/// never carries the internal id or the password hash.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token: String,
    pub refresh_token_expires_at: Timestamp,
    pub user: UserResponse,
}

fn auth_response(pair: TokenPair, user: &User) -> AuthResponse {
    AuthResponse {
        session_id: pair.session_id,
        access_token: pair.access_token,
        access_token_expires_at: pair.access_token_expires_at,
        refresh_token: pair.refresh_token,
        refresh_token_expires_at: pair.refresh_token_expires_at,
        user: UserResponse::from(user),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /user
///
/// Register a new account. Returns the user plus a full token pair, so a
/// fresh registration is already logged in.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let user = state
        .auth
        .register(&input.email, &input.username, &input.password)
        .await?;

    let (user_agent, client_ip) = client_meta(&headers);
    let pair = state
        .tokens
        .issue_pair(&TokenUser::from(&user), &user_agent, &client_ip)
        .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(Json(auth_response(pair, &user)))
}

/// POST /user/login
///
/// Authenticate with email + password. Returns the same shape as register.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let user = state.auth.login(&input.email, &input.password).await?;

    let (user_agent, client_ip) = client_meta(&headers);
    let pair = state
        .tokens
        .issue_pair(&TokenUser::from(&user), &user_agent, &client_ip)
        .await?;

    Ok(Json(auth_response(pair, &user)))
}

/// POST /user/logout
///
/// Delete the refresh session named by the submitted token. Outstanding
/// access tokens stay valid until their own expiry.
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<LogoutRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.refresh_token.is_empty() {
        return Err(AppError::BadRequest("missing refresh token".to_string()));
    }

    let payload = state.tokens.revoke(&input.refresh_token).await?;

    Ok(Json(MessageResponse {
        message: format!("{} logout successfully", payload.user.email),
    }))
}

/// POST /user/reset-password-request
///
/// Issue a reset OTP and email it to the account address. Without SMTP
/// configured the OTP is still stored, so the flow remains testable.
pub async fn reset_password_request(
    State(state): State<AppState>,
    Json(input): Json<OtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.email.is_empty() {
        return Err(AppError::BadRequest("missing email field".to_string()));
    }
    validate_email(&input.email).map_err(AppError::BadRequest)?;

    let session = state.auth.request_password_reset(&input.email).await?;

    match &state.mailer {
        Some(mailer) => {
            mailer
                .send_password_reset_otp(&session.email, &session.otp)
                .await
                .map_err(|e| AppError::InternalError(format!("Mail delivery error: {e}")))?;
        }
        None => {
            tracing::warn!(email = %session.email, "SMTP not configured; reset OTP not emailed");
        }
    }

    Ok(Json(MessageResponse {
        message: format!("otp has been sent to {}", input.email),
    }))
}

/// POST /user/reset-password
///
/// Complete a reset with the emailed OTP and a new password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.email.is_empty() || input.otp.is_empty() || input.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "missing email, otp or newPassword fields".to_string(),
        ));
    }
    validate_password(&input.new_password).map_err(AppError::BadRequest)?;
    validate_email(&input.email).map_err(AppError::BadRequest)?;

    state
        .auth
        .reset_password(&input.email, &input.otp, &input.new_password)
        .await?;

    tracing::info!(email = %input.email, "Password reset completed");
    Ok(Json(MessageResponse {
        message: "password reset successfully".to_string(),
    }))
}

/// GET /me
///
/// Current user profile, re-fetched from the database rather than echoed
/// from the token.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth.current_user(auth_user.payload.user.id).await?;
    Ok(Json(UserResponse::from(&user)))
}
