//! Owner-scoped task service.
//!
//! Every operation takes the acting user's id alongside the task id, and a
//! task owned by someone else is reported exactly like a task that does not
//! exist. Responses never distinguish the two.

use std::sync::Arc;

use taskdeck_core::types::DbId;
use taskdeck_db::models::task::{CreateTask, Task, UpdateTask};
use taskdeck_db::{StoreError, TaskStore};

/// Page size used when the list query names none.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on a caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Failure conditions of the task operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The task does not exist, or exists under a different owner.
    #[error("task not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => TaskError::NotFound,
            other => TaskError::Store(other),
        }
    }
}

/// Task CRUD over a [`TaskStore`], with the owner check applied here.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a task for `owner_id`. New tasks start not-done.
    pub async fn create(&self, owner_id: DbId, body: String) -> Result<Task, TaskError> {
        let task = self.store.create_task(&CreateTask { owner_id, body }).await?;
        Ok(task)
    }

    /// Fetch one task. An existing task with a different owner reads as
    /// [`TaskError::NotFound`].
    pub async fn get(&self, id: DbId, owner_id: DbId) -> Result<Task, TaskError> {
        let task = self.store.get_task(id).await.map_err(TaskError::from_store)?;
        if task.owner_id != owner_id {
            return Err(TaskError::NotFound);
        }
        Ok(task)
    }

    /// List the owner's tasks in id order. `page_id` is 1-indexed; an
    /// out-of-range `limit` is clamped rather than rejected.
    pub async fn list(
        &self,
        owner_id: DbId,
        page_id: i64,
        limit: i64,
    ) -> Result<Vec<Task>, TaskError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page_id = page_id.max(1);
        let offset = (page_id - 1) * limit;

        let tasks = self.store.list_tasks(owner_id, limit, offset).await?;
        Ok(tasks)
    }

    /// Replace a task's body and done flag. The write is scoped by id AND
    /// owner, so a non-owner update is [`TaskError::NotFound`].
    pub async fn update(
        &self,
        id: DbId,
        owner_id: DbId,
        body: String,
        is_done: bool,
    ) -> Result<Task, TaskError> {
        self.store
            .update_task(&UpdateTask {
                id,
                owner_id,
                body,
                is_done,
            })
            .await
            .map_err(TaskError::from_store)
    }

    /// Delete a task. Deleting a task you do not own (or one that never
    /// existed) is [`TaskError::NotFound`].
    pub async fn delete(&self, id: DbId, owner_id: DbId) -> Result<(), TaskError> {
        let removed = self.store.delete_task(id, owner_id).await?;
        if !removed {
            return Err(TaskError::NotFound);
        }
        Ok(())
    }
}
