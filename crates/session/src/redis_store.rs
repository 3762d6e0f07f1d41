//! Redis-backed session store.
//!
//! Sessions are stored as JSON strings under their UUID key with `SET ... EX`
//! so Redis evicts them at `expires_at` without any sweeper. A `GET` miss
//! (deleted or TTL-evicted) maps to [`SessionStoreError::NotFound`].

use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::error::SessionStoreError;
use crate::model::{CreateSession, Session};
use crate::store::SessionStore;

/// Redis-backed [`SessionStore`].
#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
}

impl RedisSessionStore {
    /// Open a client for the given URL (e.g. `redis://localhost:6379`) and
    /// verify the server is reachable.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = Client::open(url).map_err(SessionStoreError::backend)?;
        let store = Self { client };
        if !store.ping().await {
            return Err(SessionStoreError::Backend(format!(
                "redis at {url} did not answer PING"
            )));
        }
        tracing::info!(url, "Connected to session store");
        Ok(store)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, SessionStoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(SessionStoreError::backend)
    }

    /// Liveness probe used by the health endpoint.
    pub async fn ping(&self) -> bool {
        let Ok(mut conn) = self.connection().await else {
            return false;
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        matches!(pong.as_deref(), Ok("PONG"))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create_session(&self, input: CreateSession) -> Result<Session, SessionStoreError> {
        let now = Utc::now();
        let session = Session {
            id: input.id,
            user_id: input.user_id,
            refresh_token: input.refresh_token,
            user_agent: input.user_agent,
            client_ip: input.client_ip,
            is_blocked: input.is_blocked,
            expires_at: input.expires_at,
            created_at: now,
        };

        let ttl_secs = (session.expires_at - now).num_seconds();
        if ttl_secs <= 0 {
            return Err(SessionStoreError::Backend(
                "session expiry is not in the future".to_string(),
            ));
        }

        let payload = serde_json::to_string(&session)?;
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(session.id.to_string(), payload, ttl_secs as u64)
            .await
            .map_err(SessionStoreError::backend)?;
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Session, SessionStoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(id.to_string())
            .await
            .map_err(SessionStoreError::backend)?;
        let payload = value.ok_or(SessionStoreError::NotFound)?;
        Ok(serde_json::from_str(&payload)?)
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), SessionStoreError> {
        let mut conn = self.connection().await?;
        let _: u64 = conn
            .del(id.to_string())
            .await
            .map_err(SessionStoreError::backend)?;
        Ok(())
    }
}
