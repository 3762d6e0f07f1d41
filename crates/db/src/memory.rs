//! In-memory store used by unit and API tests.
//!
//! Implements every store trait over a single mutex-guarded state so tests
//! exercise the same error contract as Postgres (email uniqueness, the
//! reset-session foreign key, owner-scoped writes) without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use taskdeck_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::password_reset::{PasswordResetSession, UpsertPasswordReset};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::{PasswordResetStore, TaskStore, UserStore};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_user_id: DbId,
    tasks: Vec<Task>,
    next_task_id: DbId,
    resets: HashMap<String, PasswordResetSession>,
}

/// Mutex-guarded in-memory implementation of all store traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation {
                constraint: "uq_users_email".to_string(),
            });
        }
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: input.username.clone(),
            email: input.email.clone(),
            hashed_password: input.hashed_password.clone(),
            password_changed_at: now,
            created_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: DbId) -> Result<User, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "user" })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "user" })
    }

    async fn update_password(
        &self,
        email: &str,
        hashed_password: &str,
        changed_at: Timestamp,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(StoreError::NotFound { entity: "user" })?;
        user.hashed_password = hashed_password.to_string();
        user.password_changed_at = changed_at;
        Ok(user.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, input: &CreateTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_task_id += 1;
        let task = Task {
            id: inner.next_task_id,
            body: input.body.clone(),
            is_done: false,
            owner_id: input.owner_id,
            created_at: Utc::now(),
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: DbId) -> Result<Task, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "task" })
    }

    async fn list_tasks(
        &self,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock().unwrap();
        // tasks are appended with increasing ids, so insertion order is id order
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_task(&self, input: &UpdateTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == input.id && t.owner_id == input.owner_id)
            .ok_or(StoreError::NotFound { entity: "task" })?;
        task.body = input.body.clone();
        task.is_done = input.is_done;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: DbId, owner_id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.tasks.len();
        inner.tasks.retain(|t| !(t.id == id && t.owner_id == owner_id));
        Ok(inner.tasks.len() < before)
    }
}

#[async_trait]
impl PasswordResetStore for MemoryStore {
    async fn upsert_reset_session(
        &self,
        input: &UpsertPasswordReset,
    ) -> Result<PasswordResetSession, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "fk_password_reset_sessions_email".to_string(),
            });
        }
        let created_at = inner
            .resets
            .get(&input.email)
            .map(|s| s.created_at)
            .unwrap_or_else(Utc::now);
        let session = PasswordResetSession {
            email: input.email.clone(),
            otp: input.otp.clone(),
            expires_at: input.expires_at,
            created_at,
        };
        inner.resets.insert(input.email.clone(), session.clone());
        Ok(session)
    }

    async fn get_reset_session(&self, email: &str) -> Result<PasswordResetSession, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.resets.get(email).cloned().ok_or(StoreError::NotFound {
            entity: "password reset session",
        })
    }

    async fn delete_reset_session(&self, email: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resets.remove(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn user_input(email: &str) -> CreateUser {
        CreateUser {
            username: "alice".to_string(),
            email: email.to_string(),
            hashed_password: "$argon2id$fake".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        store.create_user(&user_input("a@test.com")).await.unwrap();

        let err = store.create_user(&user_input("a@test.com")).await.unwrap_err();
        assert_matches!(err, StoreError::UniqueViolation { .. });
    }

    #[tokio::test]
    async fn user_ids_are_serial() {
        let store = MemoryStore::new();
        let a = store.create_user(&user_input("a@test.com")).await.unwrap();
        let b = store.create_user(&user_input("b@test.com")).await.unwrap();
        assert_eq!(a.id + 1, b.id);
    }

    #[tokio::test]
    async fn reset_session_requires_existing_user() {
        let store = MemoryStore::new();
        let input = UpsertPasswordReset {
            email: "ghost@test.com".to_string(),
            otp: "123456".to_string(),
            expires_at: Utc::now(),
        };

        let err = store.upsert_reset_session(&input).await.unwrap_err();
        assert_matches!(err, StoreError::ForeignKeyViolation { .. });
    }

    #[tokio::test]
    async fn upsert_replaces_previous_otp() {
        let store = MemoryStore::new();
        store.create_user(&user_input("a@test.com")).await.unwrap();

        let mut input = UpsertPasswordReset {
            email: "a@test.com".to_string(),
            otp: "111111".to_string(),
            expires_at: Utc::now(),
        };
        store.upsert_reset_session(&input).await.unwrap();
        input.otp = "222222".to_string();
        store.upsert_reset_session(&input).await.unwrap();

        let session = store.get_reset_session("a@test.com").await.unwrap();
        assert_eq!(session.otp, "222222");
    }

    #[tokio::test]
    async fn list_tasks_pages_in_id_order() {
        let store = MemoryStore::new();
        let owner = store.create_user(&user_input("a@test.com")).await.unwrap();
        for i in 0..5 {
            store
                .create_task(&CreateTask {
                    owner_id: owner.id,
                    body: format!("task {i}"),
                })
                .await
                .unwrap();
        }

        let page = store.list_tasks(owner.id, 2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].body, "task 2");
        assert_eq!(page[1].body, "task 3");
    }

    #[tokio::test]
    async fn update_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = store.create_user(&user_input("a@test.com")).await.unwrap();
        let task = store
            .create_task(&CreateTask {
                owner_id: owner.id,
                body: "mine".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .update_task(&UpdateTask {
                id: task.id,
                owner_id: owner.id + 1,
                body: "stolen".to_string(),
                is_done: true,
            })
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = MemoryStore::new();
        let owner = store.create_user(&user_input("a@test.com")).await.unwrap();
        let task = store
            .create_task(&CreateTask {
                owner_id: owner.id,
                body: "mine".to_string(),
            })
            .await
            .unwrap();

        assert!(!store.delete_task(task.id, owner.id + 1).await.unwrap());
        assert!(store.delete_task(task.id, owner.id).await.unwrap());
        assert!(!store.delete_task(task.id, owner.id).await.unwrap());
    }
}
