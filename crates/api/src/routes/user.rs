//! Route definitions for the `/user` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST /                        -> register
/// POST /login                   -> login
/// POST /logout                  -> logout (takes the refresh token)
/// POST /reset-password-request  -> email a reset OTP
/// POST /reset-password          -> reset the password with the OTP
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/reset-password-request", post(users::reset_password_request))
        .route("/reset-password", post(users::reset_password))
}
