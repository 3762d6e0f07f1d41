//! Repository for the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;
use taskdeck_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::user::{CreateUser, User};
use crate::store::UserStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, hashed_password, password_changed_at, created_at";

/// PostgreSQL-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (username, email, hashed_password)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "user"))
    }

    async fn get_user_by_id(&self, id: DbId) -> Result<User, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "user"))?
            .ok_or(StoreError::NotFound { entity: "user" })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "user"))?
            .ok_or(StoreError::NotFound { entity: "user" })
    }

    async fn update_password(
        &self,
        email: &str,
        hashed_password: &str,
        changed_at: Timestamp,
    ) -> Result<User, StoreError> {
        let query = format!(
            "UPDATE users SET
                hashed_password = $2,
                password_changed_at = $3
             WHERE email = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(hashed_password)
            .bind(changed_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "user"))?
            .ok_or(StoreError::NotFound { entity: "user" })
    }
}
