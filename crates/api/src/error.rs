use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskdeck_db::StoreError;
use taskdeck_session::SessionStoreError;

use crate::auth::service::AuthError;
use crate::tasks::TaskError;
use crate::token::codec::TokenError;
use crate::token::service::TokenServiceError;

/// Boundary error for the HTTP handlers.
///
/// Service-layer errors convert in via `#[from]`; the [`IntoResponse`]
/// impl turns every variant into the `{error, code}` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An account-flow error from the auth service.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A token-lifecycle error from the token service.
    #[error(transparent)]
    Token(#[from] TokenServiceError),

    /// A task CRUD error from the task service.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// A request that failed authentication before reaching a service.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed or failed-validation input, reported verbatim to the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure the client cannot act on. The detail is logged, not returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Handler result alias; every route returns this.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(err) => classify_auth_error(err),
            AppError::Token(err) => classify_token_error(err),
            AppError::Task(err) => classify_task_error(err),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal("Internal error", msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an auth-service error into an HTTP status, error code, and message.
///
/// Pre-authentication failures (bad registration input, bad credentials,
/// unknown reset email) are 400s; failures of a presented credential (OTP,
/// token subject) are 401s. Internals stay opaque.
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::EmailInUse | AuthError::InvalidCredentials | AuthError::EmailNotFound => {
            (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
        }
        AuthError::UserNotFound
        | AuthError::OtpNotRequested
        | AuthError::OtpMismatch
        | AuthError::OtpExpired => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string()),
        AuthError::Hash(msg) => internal("Password hashing error", msg),
        AuthError::Store(store) => classify_store_error(store),
    }
}

/// Classify a token-service error. Everything a client can cause is a 401
/// with the exact rejection reason; signing and backend failures are 500s.
fn classify_token_error(err: &TokenServiceError) -> (StatusCode, &'static str, String) {
    match err {
        TokenServiceError::Token(TokenError::Signing(msg)) => internal("Token signing error", msg),
        TokenServiceError::Session(SessionStoreError::NotFound) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string())
        }
        TokenServiceError::Session(other) => internal("Session store error", other),
        other => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", other.to_string()),
    }
}

fn classify_task_error(err: &TaskError) -> (StatusCode, &'static str, String) {
    match err {
        TaskError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        TaskError::Store(store) => classify_store_error(store),
    }
}

/// Classify a store error that reached the boundary unmapped.
///
/// - `NotFound` maps to 404 with the entity named.
/// - Unique violations map to 409.
/// - Foreign-key violations map to 400.
/// - Anything else is logged and collapsed to a sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StoreError::UniqueViolation { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::ForeignKeyViolation { .. } => {
            (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
        }
        StoreError::Database(_) => internal("Database error", err),
    }
}

fn internal(context: &str, detail: impl std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "internal server error".to_string(),
    )
}
