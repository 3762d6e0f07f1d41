//! Repository for the `tasks` table.

use async_trait::async_trait;
use sqlx::PgPool;
use taskdeck_core::types::DbId;

use crate::error::StoreError;
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::store::TaskStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, body, is_done, owner_id, created_at";

/// PostgreSQL-backed [`TaskStore`].
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create_task(&self, input: &CreateTask) -> Result<Task, StoreError> {
        let query = format!(
            "INSERT INTO tasks (body, owner_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.body)
            .bind(input.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "task"))
    }

    async fn get_task(&self, id: DbId) -> Result<Task, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "task"))?
            .ok_or(StoreError::NotFound { entity: "task" })
    }

    async fn list_tasks(
        &self,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE owner_id = $1
             ORDER BY id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "task"))
    }

    async fn update_task(&self, input: &UpdateTask) -> Result<Task, StoreError> {
        let query = format!(
            "UPDATE tasks SET
                body = $3,
                is_done = $4
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(&input.body)
            .bind(input.is_done)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "task"))?
            .ok_or(StoreError::NotFound { entity: "task" })
    }

    async fn delete_task(&self, id: DbId, owner_id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "task"))?;
        Ok(result.rows_affected() > 0)
    }
}
