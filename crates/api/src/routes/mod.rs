pub mod health;
pub mod tasks;
pub mod tokens;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the API route tree, mounted at the root (no version prefix).
///
/// Route hierarchy:
///
/// ```text
/// /user                          register (POST, public)
/// /user/login                    login (POST, public)
/// /user/logout                   logout (POST, takes the refresh token)
/// /user/reset-password-request   request a reset OTP (POST, public)
/// /user/reset-password           reset password with the OTP (POST, public)
///
/// /tokens/renew_access           renew access token (POST, takes the refresh token)
///
/// /me                            current user profile (GET, bearer)
///
/// /task                          list, create (bearer)
/// /task/{id}                     get, update, delete (bearer)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Account routes (register, login, logout, password reset).
        .nest("/user", user::router())
        // Token lifecycle.
        .nest("/tokens", tokens::router())
        // Current user profile (bearer-protected).
        .route("/me", get(handlers::users::me))
        // Owner-scoped task CRUD (bearer-protected).
        .nest("/task", tasks::router())
}
