//! Repository for the `password_reset_sessions` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::password_reset::{PasswordResetSession, UpsertPasswordReset};
use crate::store::PasswordResetStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "email, otp, expires_at, created_at";

/// PostgreSQL-backed [`PasswordResetStore`].
#[derive(Clone)]
pub struct PgPasswordResetStore {
    pool: PgPool,
}

impl PgPasswordResetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetStore for PgPasswordResetStore {
    async fn upsert_reset_session(
        &self,
        input: &UpsertPasswordReset,
    ) -> Result<PasswordResetSession, StoreError> {
        // Single upsert so two concurrent requests for the same email
        // resolve last-writer-wins instead of racing an update and an insert.
        let query = format!(
            "INSERT INTO password_reset_sessions (email, otp, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET
                otp = EXCLUDED.otp,
                expires_at = EXCLUDED.expires_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordResetSession>(&query)
            .bind(&input.email)
            .bind(&input.otp)
            .bind(input.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "password reset session"))
    }

    async fn get_reset_session(&self, email: &str) -> Result<PasswordResetSession, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM password_reset_sessions WHERE email = $1");
        sqlx::query_as::<_, PasswordResetSession>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "password reset session"))?
            .ok_or(StoreError::NotFound {
                entity: "password reset session",
            })
    }

    async fn delete_reset_session(&self, email: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM password_reset_sessions WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "password reset session"))?;
        Ok(())
    }
}
