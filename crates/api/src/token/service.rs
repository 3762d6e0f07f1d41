//! Token lifecycle service.
//!
//! Issues access/refresh pairs, renews access tokens against the session
//! store, and revokes sessions on logout. The refresh token is the only
//! stateful credential: its payload UUID keys a [`Session`] record, and
//! renewal cross-checks the presented token against that record before a
//! new access token is minted.

use std::sync::Arc;

use chrono::Utc;
use taskdeck_core::types::Timestamp;
use taskdeck_session::{CreateSession, SessionStore, SessionStoreError};
use uuid::Uuid;

use crate::token::codec::{TokenCodec, TokenError, TokenPayload, TokenUser};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure conditions of the token lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenServiceError {
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The session exists but has been administratively blocked.
    #[error("blocked session")]
    BlockedSession,

    /// The session belongs to a different user than the token claims.
    #[error("incorrect session user")]
    SessionUserMismatch,

    /// The presented refresh token is not the one stored for this session.
    #[error("mismatch session token")]
    SessionTokenMismatch,

    /// The session record has outlived its own expiry timestamp.
    #[error("expired session")]
    SessionExpired,

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// An access/refresh pair plus the id of the session backing the refresh
/// token. `session_id` equals the refresh token's payload UUID.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token: String,
    pub refresh_token_expires_at: Timestamp,
}

/// A fresh access token minted from a still-valid refresh token.
#[derive(Debug, Clone)]
pub struct RenewedAccess {
    pub access_token: String,
    pub access_token_expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Issues, renews and revokes token pairs against a [`SessionStore`].
pub struct TokenService {
    codec: Arc<dyn TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Self {
        Self {
            codec,
            sessions,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Mint an access/refresh pair for `user` and persist the session that
    /// backs the refresh token.
    ///
    /// The pair is only returned once the session record is stored; if the
    /// store rejects the write no tokens reach the caller.
    pub async fn issue_pair(
        &self,
        user: &TokenUser,
        user_agent: &str,
        client_ip: &str,
    ) -> Result<TokenPair, TokenServiceError> {
        let (access_token, access_payload) = self.codec.create_token(user, self.access_ttl)?;
        let (refresh_token, refresh_payload) = self.codec.create_token(user, self.refresh_ttl)?;

        let session = self
            .sessions
            .create_session(CreateSession {
                id: refresh_payload.id,
                user_id: user.id,
                refresh_token: refresh_token.clone(),
                user_agent: user_agent.to_owned(),
                client_ip: client_ip.to_owned(),
                is_blocked: false,
                expires_at: refresh_payload.expires_at,
            })
            .await?;

        Ok(TokenPair {
            session_id: session.id,
            access_token,
            access_token_expires_at: access_payload.expires_at,
            refresh_token,
            refresh_token_expires_at: refresh_payload.expires_at,
        })
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// After signature and expiry verification the backing session is
    /// checked in a fixed order: blocked flag, then session/token user
    /// match, then stored/presented token match, then session expiry. The
    /// expiry check is repeated here even though both store backends treat
    /// expired sessions as absent.
    pub async fn renew_access(
        &self,
        refresh_token: &str,
    ) -> Result<RenewedAccess, TokenServiceError> {
        let payload = self.codec.verify_token(refresh_token)?;
        let session = self.sessions.get_session(payload.id).await?;

        if session.is_blocked {
            return Err(TokenServiceError::BlockedSession);
        }
        if session.user_id != payload.user.id {
            return Err(TokenServiceError::SessionUserMismatch);
        }
        if session.refresh_token != refresh_token {
            return Err(TokenServiceError::SessionTokenMismatch);
        }
        if session.expires_at <= Utc::now() {
            return Err(TokenServiceError::SessionExpired);
        }

        let (access_token, access_payload) =
            self.codec.create_token(&payload.user, self.access_ttl)?;

        Ok(RenewedAccess {
            access_token,
            access_token_expires_at: access_payload.expires_at,
        })
    }

    /// Delete the session behind a refresh token, ending its renewal
    /// lineage. Returns the verified payload so callers can name the user.
    ///
    /// Access tokens already issued from this session stay valid until
    /// their own expiry; revocation only stops future renewals.
    pub async fn revoke(&self, refresh_token: &str) -> Result<TokenPayload, TokenServiceError> {
        let payload = self.codec.verify_token(refresh_token)?;
        self.sessions.delete_session(payload.id).await?;
        Ok(payload)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::codec::JwtCodec;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use taskdeck_session::{MemorySessionStore, Session};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn test_user() -> TokenUser {
        TokenUser {
            id: 42,
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
        }
    }

    fn service(sessions: Arc<dyn SessionStore>) -> TokenService {
        TokenService::new(
            Arc::new(JwtCodec::new(SECRET)),
            sessions,
            chrono::Duration::minutes(15),
            chrono::Duration::days(7),
        )
    }

    /// Returns one preset session for every lookup, regardless of id.
    struct FixedSessionStore {
        session: Session,
    }

    #[async_trait]
    impl SessionStore for FixedSessionStore {
        async fn create_session(
            &self,
            _input: CreateSession,
        ) -> Result<Session, SessionStoreError> {
            Ok(self.session.clone())
        }

        async fn get_session(&self, _id: Uuid) -> Result<Session, SessionStoreError> {
            Ok(self.session.clone())
        }

        async fn delete_session(&self, _id: Uuid) -> Result<(), SessionStoreError> {
            Ok(())
        }
    }

    /// Fails every operation, as a disconnected backend would.
    struct FailingSessionStore;

    #[async_trait]
    impl SessionStore for FailingSessionStore {
        async fn create_session(
            &self,
            _input: CreateSession,
        ) -> Result<Session, SessionStoreError> {
            Err(SessionStoreError::backend("connection refused"))
        }

        async fn get_session(&self, _id: Uuid) -> Result<Session, SessionStoreError> {
            Err(SessionStoreError::backend("connection refused"))
        }

        async fn delete_session(&self, _id: Uuid) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::backend("connection refused"))
        }
    }

    /// Mint a refresh token and a session record that matches it, then let
    /// the caller distort the record before it is served back.
    fn token_with_session(distort: impl FnOnce(&mut Session)) -> (String, FixedSessionStore) {
        let codec = JwtCodec::new(SECRET);
        let (token, payload) = codec
            .create_token(&test_user(), chrono::Duration::days(7))
            .unwrap();
        let mut session = Session {
            id: payload.id,
            user_id: payload.user.id,
            refresh_token: token.clone(),
            user_agent: "tests".to_string(),
            client_ip: "127.0.0.1".to_string(),
            is_blocked: false,
            expires_at: payload.expires_at,
            created_at: Utc::now(),
        };
        distort(&mut session);
        (token, FixedSessionStore { session })
    }

    #[tokio::test]
    async fn issue_pair_persists_matching_session() {
        let sessions = Arc::new(MemorySessionStore::new());
        let svc = service(sessions.clone());

        let pair = svc.issue_pair(&test_user(), "curl/8", "10.0.0.1").await.unwrap();

        let session = sessions.get_session(pair.session_id).await.unwrap();
        assert_eq!(session.user_id, 42);
        assert_eq!(session.refresh_token, pair.refresh_token);
        assert_eq!(session.user_agent, "curl/8");
        assert_eq!(session.client_ip, "10.0.0.1");
        assert!(!session.is_blocked);
        assert_eq!(session.expires_at, pair.refresh_token_expires_at);
        assert!(pair.access_token_expires_at < pair.refresh_token_expires_at);
    }

    #[tokio::test]
    async fn renew_access_mints_a_token_for_the_session_user() {
        let svc = service(Arc::new(MemorySessionStore::new()));
        let pair = svc.issue_pair(&test_user(), "", "").await.unwrap();

        let renewed = svc.renew_access(&pair.refresh_token).await.unwrap();

        let codec = JwtCodec::new(SECRET);
        let payload = codec.verify_token(&renewed.access_token).unwrap();
        assert_eq!(payload.user, test_user());
        assert_eq!(payload.expires_at, renewed.access_token_expires_at);
    }

    #[tokio::test]
    async fn renew_with_access_token_finds_no_session() {
        // The access token is well formed and signed, but its payload UUID
        // was never stored as a session.
        let svc = service(Arc::new(MemorySessionStore::new()));
        let pair = svc.issue_pair(&test_user(), "", "").await.unwrap();

        let err = svc.renew_access(&pair.access_token).await.unwrap_err();
        assert_matches!(
            err,
            TokenServiceError::Session(SessionStoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn renew_with_garbage_is_a_token_error() {
        let svc = service(Arc::new(MemorySessionStore::new()));

        let err = svc.renew_access("not-a-token").await.unwrap_err();
        assert_matches!(err, TokenServiceError::Token(TokenError::Invalid));
    }

    #[tokio::test]
    async fn blocked_session_refuses_renewal() {
        let (token, store) = token_with_session(|s| s.is_blocked = true);
        let svc = service(Arc::new(store));

        let err = svc.renew_access(&token).await.unwrap_err();
        assert_matches!(err, TokenServiceError::BlockedSession);
        assert_eq!(err.to_string(), "blocked session");
    }

    #[tokio::test]
    async fn session_owned_by_another_user_refuses_renewal() {
        let (token, store) = token_with_session(|s| s.user_id = 7);
        let svc = service(Arc::new(store));

        let err = svc.renew_access(&token).await.unwrap_err();
        assert_matches!(err, TokenServiceError::SessionUserMismatch);
        assert_eq!(err.to_string(), "incorrect session user");
    }

    #[tokio::test]
    async fn session_storing_a_different_token_refuses_renewal() {
        let (token, store) =
            token_with_session(|s| s.refresh_token = "some-other-token".to_string());
        let svc = service(Arc::new(store));

        let err = svc.renew_access(&token).await.unwrap_err();
        assert_matches!(err, TokenServiceError::SessionTokenMismatch);
        assert_eq!(err.to_string(), "mismatch session token");
    }

    #[tokio::test]
    async fn session_past_its_expiry_refuses_renewal() {
        // The token itself is still valid; only the record's expiry has
        // passed, as happens with a store that keeps expired rows.
        let (token, store) =
            token_with_session(|s| s.expires_at = Utc::now() - chrono::Duration::seconds(1));
        let svc = service(Arc::new(store));

        let err = svc.renew_access(&token).await.unwrap_err();
        assert_matches!(err, TokenServiceError::SessionExpired);
        assert_eq!(err.to_string(), "expired session");
    }

    #[tokio::test]
    async fn issue_pair_yields_nothing_when_the_store_fails() {
        let svc = service(Arc::new(FailingSessionStore));

        let result = svc.issue_pair(&test_user(), "", "").await;
        assert_matches!(
            result,
            Err(TokenServiceError::Session(SessionStoreError::Backend(_)))
        );
    }

    #[tokio::test]
    async fn revoke_deletes_the_session_and_names_the_user() {
        let sessions = Arc::new(MemorySessionStore::new());
        let svc = service(sessions.clone());
        let pair = svc.issue_pair(&test_user(), "", "").await.unwrap();

        let payload = svc.revoke(&pair.refresh_token).await.unwrap();
        assert_eq!(payload.user.email, "ada@example.com");

        let err = svc.renew_access(&pair.refresh_token).await.unwrap_err();
        assert_matches!(
            err,
            TokenServiceError::Session(SessionStoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn revoke_rejects_garbage_tokens() {
        let svc = service(Arc::new(MemorySessionStore::new()));

        let err = svc.revoke("garbage").await.unwrap_err();
        assert_matches!(err, TokenServiceError::Token(TokenError::Invalid));
    }
}
