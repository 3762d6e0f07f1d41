//! In-memory session store used by unit and API tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::SessionStoreError;
use crate::model::{CreateSession, Session};
use crate::store::SessionStore;

/// Mutex-guarded map with expiry checked on read, mirroring Redis TTL
/// semantics closely enough for tests: an expired session reads back as
/// [`SessionStoreError::NotFound`].
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, input: CreateSession) -> Result<Session, SessionStoreError> {
        let session = Session {
            id: input.id,
            user_id: input.user_id,
            refresh_token: input.refresh_token,
            user_agent: input.user_agent,
            client_ip: input.client_ip,
            is_blocked: input.is_blocked,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Session, SessionStoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(&id) {
            Some(session) if session.expires_at <= Utc::now() => {
                sessions.remove(&id);
                Err(SessionStoreError::NotFound)
            }
            Some(session) => Ok(session.clone()),
            None => Err(SessionStoreError::NotFound),
        }
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), SessionStoreError> {
        self.sessions.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn session_input(expires_in_secs: i64) -> CreateSession {
        CreateSession {
            id: Uuid::new_v4(),
            user_id: 1,
            refresh_token: "refresh".to_string(),
            user_agent: "test".to_string(),
            client_ip: "127.0.0.1".to_string(),
            is_blocked: false,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_the_session() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session_input(60)).await.unwrap();

        let fetched = store.get_session(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn expired_session_reads_as_not_found() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session_input(-1)).await.unwrap();

        let err = store.get_session(created.id).await.unwrap_err();
        assert_matches!(err, SessionStoreError::NotFound);
    }

    #[tokio::test]
    async fn get_after_delete_is_not_found() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session_input(60)).await.unwrap();

        store.delete_session(created.id).await.unwrap();
        let err = store.get_session(created.id).await.unwrap_err();
        assert_matches!(err, SessionStoreError::NotFound);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemorySessionStore::new();
        let id = Uuid::new_v4();

        assert!(store.delete_session(id).await.is_ok());
        assert!(store.delete_session(id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = MemorySessionStore::new();
        let err = store.get_session(Uuid::new_v4()).await.unwrap_err();
        assert_matches!(err, SessionStoreError::NotFound);
    }
}
