//! User row and its request/response shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskdeck_core::types::{DbId, Timestamp};

/// A row of the `users` table.
///
/// Carries `hashed_password`, so it must never cross the API boundary
/// as-is; convert to [`UserResponse`] first.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub password_changed_at: Timestamp,
    pub created_at: Timestamp,
}

/// What callers get back for a user: everything except the hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub password_changed_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}

/// Insert payload; the caller hashes the password before building this.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}
