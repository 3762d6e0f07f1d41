//! The session store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SessionStoreError;
use crate::model::{CreateSession, Session};

/// TTL'd key-value storage for refresh-token sessions.
///
/// Sessions are immutable once created; there is no update operation. A
/// session lives until its `expires_at` passes or it is deleted, and both
/// states read back as [`SessionStoreError::NotFound`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a session under its id with a TTL derived from `expires_at`.
    async fn create_session(&self, input: CreateSession) -> Result<Session, SessionStoreError>;

    /// Fetch a session by id. Absent and expired sessions both fail with
    /// [`SessionStoreError::NotFound`].
    async fn get_session(&self, id: Uuid) -> Result<Session, SessionStoreError>;

    /// Delete a session by id. Deleting a missing session is not an error.
    async fn delete_session(&self, id: Uuid) -> Result<(), SessionStoreError>;
}
