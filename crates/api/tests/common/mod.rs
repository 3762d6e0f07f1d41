use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use taskdeck_db::memory::MemoryStore;
use taskdeck_db::store::{PasswordResetStore, TaskStore, UserStore};
use taskdeck_session::{MemorySessionStore, SessionStore};

use taskdeck_api::auth::service::AuthService;
use taskdeck_api::config::ServerConfig;
use taskdeck_api::router::build_app_router;
use taskdeck_api::state::{AppState, HealthProbes};
use taskdeck_api::tasks::TaskService;
use taskdeck_api::token::codec::{JwtCodec, JwtConfig, TokenCodec};
use taskdeck_api::token::service::TokenService;

/// Signing secret shared by every test app.
pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// `ServerConfig` for tests: dev CORS origin, 30 s timeout, production-like
/// token lifetimes.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        otp_ttl_secs: 61,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// A fully wired application backed by in-memory stores.
///
/// The store handles are exposed so tests can reach behind the HTTP surface:
/// reading a password-reset OTP that would normally arrive by email, or
/// blocking a session to exercise renewal refusal.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    /// Clone of the router for a single `oneshot` call.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Wire real services over memory stores and assemble the application.
///
/// The router comes from [`build_app_router`], so test requests cross the
/// same middleware stack production serves. No mailer is wired; the
/// password-reset flow logs a warning instead of sending.
pub fn build_test_app() -> TestApp {
    let config = test_config();

    let store = Arc::new(MemoryStore::new());
    let sessions = Arc::new(MemorySessionStore::new());

    let users: Arc<dyn UserStore> = store.clone();
    let resets: Arc<dyn PasswordResetStore> = store.clone();
    let task_store: Arc<dyn TaskStore> = store.clone();
    let session_store: Arc<dyn SessionStore> = sessions.clone();

    let codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(TEST_SECRET));

    let tokens = Arc::new(TokenService::new(
        Arc::clone(&codec),
        session_store,
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
        mailer: None,
        probes: HealthProbes::default(),
    };

    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        sessions,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request with no auth header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and no auth header.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
