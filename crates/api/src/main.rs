use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck_db::repositories::{PgPasswordResetStore, PgTaskStore, PgUserStore};
use taskdeck_db::store::{PasswordResetStore, TaskStore, UserStore};
use taskdeck_session::{RedisSessionStore, SessionStore};

use taskdeck_api::auth::service::AuthService;
use taskdeck_api::config::ServerConfig;
use taskdeck_api::mail::{Mailer, SmtpConfig};
use taskdeck_api::router::build_app_router;
use taskdeck_api::state::{AppState, HealthProbes};
use taskdeck_api::tasks::TaskService;
use taskdeck_api::token::codec::{JwtCodec, TokenCodec};
use taskdeck_api::token::service::TokenService;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // Postgres: pool, reachability probe, migrations.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = taskdeck_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to Postgres");
    taskdeck_db::health_check(&pool)
        .await
        .expect("Postgres did not answer the startup probe");
    taskdeck_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    tracing::info!("Postgres ready, migrations applied");

    // Redis holds the refresh-token sessions.
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let session_store = RedisSessionStore::connect(&redis_url)
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Redis session store connected");

    // Mail is optional; without SMTP_HOST the reset flow skips delivery.
    let mailer = match SmtpConfig::from_env() {
        Some(smtp) => {
            let mailer = Mailer::new(&smtp).expect("Failed to build SMTP transport");
            tracing::info!(host = %smtp.host, "SMTP mailer ready");
            Some(Arc::new(mailer))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, password-reset emails will not be delivered");
            None
        }
    };

    // Wire the services over their store traits.
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let resets: Arc<dyn PasswordResetStore> = Arc::new(PgPasswordResetStore::new(pool.clone()));
    let task_store: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool.clone()));
    let sessions: Arc<dyn SessionStore> = Arc::new(session_store.clone());
    let codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(&config.jwt.secret));

    let tokens = Arc::new(TokenService::new(
        Arc::clone(&codec),
        sessions,
        config.jwt.access_ttl(),
        config.jwt.refresh_ttl(),
    ));
    let auth = Arc::new(AuthService::new(
        users,
        resets,
        chrono::Duration::seconds(config.otp_ttl_secs),
    ));
    let tasks = Arc::new(TaskService::new(task_store));

    let state = AppState {
        config: Arc::new(config.clone()),
        auth,
        tokens,
        tasks,
        codec,
        mailer,
        probes: HealthProbes {
            pool: Some(pool),
            sessions: Some(Arc::new(session_store)),
        },
    };

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not a valid IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shutdown complete");
}

/// Resolve once a termination signal arrives.
///
/// Listens for SIGINT (Ctrl-C) and, on Unix, SIGTERM, covering both an
/// interactive stop and a process manager's stop request.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
