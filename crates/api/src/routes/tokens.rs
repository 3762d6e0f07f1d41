//! Route definitions for the `/tokens` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::tokens;
use crate::state::AppState;

/// Routes mounted at `/tokens`.
///
/// ```text
/// POST /renew_access  -> renew_access
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/renew_access", post(tokens::renew_access))
}
