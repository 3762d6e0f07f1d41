//! Store traits abstracting the relational backend.
//!
//! Services hold `Arc<dyn UserStore>` (etc.) rather than a pool, so the
//! Postgres repositories and the in-memory test store are interchangeable.

use async_trait::async_trait;
use taskdeck_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::password_reset::{PasswordResetSession, UpsertPasswordReset};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

/// Persistence operations over the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email fails with [`StoreError::UniqueViolation`].
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    /// Fetch a user by internal id.
    async fn get_user_by_id(&self, id: DbId) -> Result<User, StoreError>;

    /// Fetch a user by email (case-sensitive).
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Replace a user's password hash and stamp `password_changed_at`.
    async fn update_password(
        &self,
        email: &str,
        hashed_password: &str,
        changed_at: Timestamp,
    ) -> Result<User, StoreError>;
}

/// Persistence operations over the `tasks` table.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task, returning the created row.
    async fn create_task(&self, input: &CreateTask) -> Result<Task, StoreError>;

    /// Fetch a task by id without an ownership filter. Callers decide how to
    /// report a task the requester does not own.
    async fn get_task(&self, id: DbId) -> Result<Task, StoreError>;

    /// List tasks owned by `owner_id`, ordered by id.
    async fn list_tasks(
        &self,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, StoreError>;

    /// Update a task's body and done flag, scoped by id AND owner.
    ///
    /// A non-owner (or nonexistent id) matches zero rows and fails with
    /// [`StoreError::NotFound`].
    async fn update_task(&self, input: &UpdateTask) -> Result<Task, StoreError>;

    /// Delete a task, scoped by id AND owner. Returns `true` if a row was
    /// actually removed.
    async fn delete_task(&self, id: DbId, owner_id: DbId) -> Result<bool, StoreError>;
}

/// Persistence operations over the `password_reset_sessions` table.
#[async_trait]
pub trait PasswordResetStore: Send + Sync {
    /// Create or refresh the reset session for an email (one live session
    /// per email, last write wins).
    ///
    /// An email with no matching user fails with
    /// [`StoreError::ForeignKeyViolation`].
    async fn upsert_reset_session(
        &self,
        input: &UpsertPasswordReset,
    ) -> Result<PasswordResetSession, StoreError>;

    /// Fetch the pending reset session for an email.
    async fn get_reset_session(&self, email: &str) -> Result<PasswordResetSession, StoreError>;

    /// Remove the reset session for an email. Deleting a missing session is
    /// not an error.
    async fn delete_reset_session(&self, email: &str) -> Result<(), StoreError>;
}
