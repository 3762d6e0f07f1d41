//! Request handlers for the task-management API.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input, delegate to the services carried in
//! [`AppState`](crate::state::AppState), and map errors via
//! [`AppError`](crate::error::AppError).

use axum::http::HeaderMap;
use serde::Serialize;

pub mod tasks;
pub mod tokens;
pub mod users;

/// Generic `{"message": ...}` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Client metadata recorded on each session: the user agent and a
/// best-effort client IP (first `x-forwarded-for` entry, then `x-real-ip`,
/// else empty).
pub(crate) fn client_meta(headers: &HeaderMap) -> (String, String) {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .unwrap_or_default()
        .trim()
        .to_string();

    (user_agent, client_ip)
}
