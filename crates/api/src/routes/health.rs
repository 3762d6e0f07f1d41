//! Liveness endpoint with per-dependency probes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// "ok" when every wired probe answers, "degraded" otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether Postgres answered the probe.
    pub db_healthy: bool,
    /// Whether the session store answered the probe.
    pub session_healthy: bool,
}

/// GET /health -- reports service, database, and session-store health.
///
/// Probes that are not wired (memory-backed test apps) count as healthy.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match &state.probes.pool {
        Some(pool) => taskdeck_db::health_check(pool).await.is_ok(),
        None => true,
    };
    let session_healthy = match &state.probes.sessions {
        Some(store) => store.ping().await,
        None => true,
    };

    let status = if db_healthy && session_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        session_healthy,
    })
}

/// Mounted at the root, alongside the API route tree.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
