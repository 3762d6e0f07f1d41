//! Account service: registration, login, profile lookup, password reset.
//!
//! Holds store trait objects rather than a pool, so API tests run the full
//! flows against [`taskdeck_db::MemoryStore`]. Password hashes never leave
//! this module except inside a [`User`] row.

use std::sync::Arc;

use chrono::Utc;
use taskdeck_core::otp::generate_otp;
use taskdeck_core::types::DbId;
use taskdeck_db::models::password_reset::{PasswordResetSession, UpsertPasswordReset};
use taskdeck_db::models::user::{CreateUser, User};
use taskdeck_db::{PasswordResetStore, StoreError, UserStore};

use crate::auth::password::{hash_password, verify_password};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure conditions of the account flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration hit the email uniqueness constraint.
    #[error("email has been used")]
    EmailInUse,

    /// Login failed. Unknown email and wrong password collapse into this
    /// one variant so responses cannot be used to enumerate accounts.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    /// A verified token names a user id that no longer exists.
    #[error("user no longer exists")]
    UserNotFound,

    /// A password reset was requested for an email with no account.
    #[error("email not found")]
    EmailNotFound,

    /// A reset was submitted for an email with no pending reset session.
    #[error("otp not requested")]
    OtpNotRequested,

    /// The submitted OTP does not equal the stored one.
    #[error("otp not matched")]
    OtpMismatch,

    /// The stored OTP exists but its deadline has passed.
    #[error("otp timeout")]
    OtpExpired,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Registration, login and password-reset flows over the user stores.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    resets: Arc<dyn PasswordResetStore>,
    otp_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        resets: Arc<dyn PasswordResetStore>,
        otp_ttl: chrono::Duration,
    ) -> Self {
        Self {
            users,
            resets,
            otp_ttl,
        }
    }

    /// Create an account. The password is hashed here; stores only ever see
    /// the digest.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let hashed = hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;
        let user = self
            .users
            .create_user(&CreateUser {
                username: username.to_owned(),
                email: email.to_owned(),
                hashed_password: hashed,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { .. } => AuthError::EmailInUse,
                other => AuthError::Store(other),
            })?;
        Ok(user)
    }

    /// Authenticate by email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .get_user_by_email(email)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AuthError::InvalidCredentials,
                other => AuthError::Store(other),
            })?;

        let matches =
            verify_password(password, &user.hashed_password).map_err(|e| AuthError::Hash(e.to_string()))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Re-fetch the acting user's row. Token payloads can outlive the
    /// account, so an absent row reads as [`AuthError::UserNotFound`].
    pub async fn current_user(&self, id: DbId) -> Result<User, AuthError> {
        self.users.get_user_by_id(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => AuthError::UserNotFound,
            other => AuthError::Store(other),
        })
    }

    /// Start (or restart) a password reset: generate a 6-digit OTP and store
    /// it under the email with `expires_at = now + otp_ttl`. A repeated
    /// request overwrites the previous code.
    ///
    /// The OTP is returned for delivery; it is never logged here.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<PasswordResetSession, AuthError> {
        let session = self
            .resets
            .upsert_reset_session(&UpsertPasswordReset {
                email: email.to_owned(),
                otp: generate_otp(),
                expires_at: Utc::now() + self.otp_ttl,
            })
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation { .. } => AuthError::EmailNotFound,
                other => AuthError::Store(other),
            })?;
        Ok(session)
    }

    /// Complete a password reset: check the OTP and its deadline, persist
    /// the new hash, then delete the reset session so the code cannot be
    /// replayed.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let session = self
            .resets
            .get_reset_session(email)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AuthError::OtpNotRequested,
                other => AuthError::Store(other),
            })?;

        if session.otp != otp {
            return Err(AuthError::OtpMismatch);
        }
        if session.expires_at <= Utc::now() {
            return Err(AuthError::OtpExpired);
        }

        let hashed = hash_password(new_password).map_err(|e| AuthError::Hash(e.to_string()))?;
        self.users.update_password(email, &hashed, Utc::now()).await?;
        self.resets.delete_reset_session(email).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use taskdeck_db::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> AuthService {
        service_with_ttl(store, 61)
    }

    fn service_with_ttl(store: &Arc<MemoryStore>, ttl_secs: i64) -> AuthService {
        AuthService::new(
            store.clone(),
            store.clone(),
            chrono::Duration::seconds(ttl_secs),
        )
    }

    #[tokio::test]
    async fn register_stores_a_digest_not_the_password() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);

        let user = svc.register("ada@test.com", "ada", "secret123").await.unwrap();
        assert_eq!(user.email, "ada@test.com");
        assert_eq!(user.username, "ada");
        assert!(user.hashed_password.starts_with("$argon2id$"));
        assert_ne!(user.hashed_password, "secret123");

        svc.login("ada@test.com", "secret123").await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let err = svc
            .register("ada@test.com", "imposter", "hunter22")
            .await
            .unwrap_err();
        assert_matches!(err, AuthError::EmailInUse);
        assert_eq!(err.to_string(), "email has been used");
    }

    #[tokio::test]
    async fn concurrent_registrations_admit_exactly_one() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);

        let (a, b) = tokio::join!(
            svc.register("ada@test.com", "ada", "secret123"),
            svc.register("ada@test.com", "ada", "secret123"),
        );

        assert!(a.is_ok() != b.is_ok(), "exactly one registration must win");
        let err = a.err().or(b.err()).unwrap();
        assert_matches!(err, AuthError::EmailInUse);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let wrong_password = svc.login("ada@test.com", "not-it").await.unwrap_err();
        let unknown_email = svc.login("ghost@test.com", "secret123").await.unwrap_err();

        assert_matches!(wrong_password, AuthError::InvalidCredentials);
        assert_matches!(unknown_email, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn current_user_reports_deleted_accounts() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let user = svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let fetched = svc.current_user(user.id).await.unwrap();
        assert_eq!(fetched.email, user.email);

        let err = svc.current_user(user.id + 1).await.unwrap_err();
        assert_matches!(err, AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn reset_request_issues_a_six_digit_otp() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let session = svc.request_password_reset("ada@test.com").await.unwrap();
        assert_eq!(session.otp.len(), 6);
        assert!(session.otp.chars().all(|c| c.is_ascii_digit()));
        assert!(session.expires_at > Utc::now());

        let stored = store.get_reset_session("ada@test.com").await.unwrap();
        assert_eq!(stored.otp, session.otp);
    }

    #[tokio::test]
    async fn reset_request_for_unknown_email_fails() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);

        let err = svc.request_password_reset("ghost@test.com").await.unwrap_err();
        assert_matches!(err, AuthError::EmailNotFound);
        assert_eq!(err.to_string(), "email not found");
    }

    #[tokio::test]
    async fn repeated_request_replaces_the_otp() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let first = svc.request_password_reset("ada@test.com").await.unwrap();
        let second = svc.request_password_reset("ada@test.com").await.unwrap();

        let stored = store.get_reset_session("ada@test.com").await.unwrap();
        assert_eq!(stored.otp, second.otp);
        // A 1-in-900000 collision would make this flaky; tolerate it.
        if first.otp != second.otp {
            assert_ne!(stored.otp, first.otp);
        }
    }

    #[tokio::test]
    async fn reset_password_end_to_end() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "old-password").await.unwrap();

        let session = svc.request_password_reset("ada@test.com").await.unwrap();
        svc.reset_password("ada@test.com", &session.otp, "new-password")
            .await
            .unwrap();

        svc.login("ada@test.com", "new-password").await.unwrap();
        let err = svc.login("ada@test.com", "old-password").await.unwrap_err();
        assert_matches!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn used_otp_cannot_be_replayed() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "old-password").await.unwrap();

        let session = svc.request_password_reset("ada@test.com").await.unwrap();
        svc.reset_password("ada@test.com", &session.otp, "new-password")
            .await
            .unwrap();

        let err = svc
            .reset_password("ada@test.com", &session.otp, "newer-password")
            .await
            .unwrap_err();
        assert_matches!(err, AuthError::OtpNotRequested);

        // The first reset must stand.
        svc.login("ada@test.com", "new-password").await.unwrap();
    }

    #[tokio::test]
    async fn wrong_otp_is_rejected_and_session_survives() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "old-password").await.unwrap();

        let session = svc.request_password_reset("ada@test.com").await.unwrap();
        let wrong = if session.otp == "123456" { "654321" } else { "123456" };

        let err = svc
            .reset_password("ada@test.com", wrong, "new-password")
            .await
            .unwrap_err();
        assert_matches!(err, AuthError::OtpMismatch);
        assert_eq!(err.to_string(), "otp not matched");

        // A failed guess does not burn the pending session.
        svc.reset_password("ada@test.com", &session.otp, "new-password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stale_otp_times_out() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with_ttl(&store, -1);
        svc.register("ada@test.com", "ada", "old-password").await.unwrap();

        let session = svc.request_password_reset("ada@test.com").await.unwrap();
        let err = svc
            .reset_password("ada@test.com", &session.otp, "new-password")
            .await
            .unwrap_err();
        assert_matches!(err, AuthError::OtpExpired);
        assert_eq!(err.to_string(), "otp timeout");

        // The old password still works.
        svc.login("ada@test.com", "old-password").await.unwrap();
    }

    #[tokio::test]
    async fn reset_without_a_pending_request_fails() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        svc.register("ada@test.com", "ada", "secret123").await.unwrap();

        let err = svc
            .reset_password("ada@test.com", "123456", "new-password")
            .await
            .unwrap_err();
        assert_matches!(err, AuthError::OtpNotRequested);
    }
}
