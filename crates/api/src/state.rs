use std::sync::Arc;

use taskdeck_db::DbPool;
use taskdeck_session::RedisSessionStore;

use crate::auth::service::AuthService;
use crate::config::ServerConfig;
use crate::mail::Mailer;
use crate::tasks::TaskService;
use crate::token::codec::TokenCodec;
use crate::token::service::TokenService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Account flows: register, login, profile, password reset.
    pub auth: Arc<AuthService>,
    /// Token lifecycle: issue, renew, revoke.
    pub tokens: Arc<TokenService>,
    /// Owner-scoped task CRUD.
    pub tasks: Arc<TaskService>,
    /// Access-token verification for the bearer extractor.
    pub codec: Arc<dyn TokenCodec>,
    /// Outbound mail; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
    /// Backend handles used only by the health endpoint.
    pub probes: HealthProbes,
}

/// Optional backend handles for liveness reporting. Tests run without either.
#[derive(Clone, Default)]
pub struct HealthProbes {
    pub pool: Option<DbPool>,
    pub sessions: Option<Arc<RedisSessionStore>>,
}
