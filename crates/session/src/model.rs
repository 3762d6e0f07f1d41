//! Session record stored per refresh token.

use serde::{Deserialize, Serialize};
use taskdeck_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// A refresh-token session.
///
/// `id` equals the UUID embedded in the refresh token's payload, which is
/// how renewal joins a presented token back to its server-side record.
/// Serialized as camelCase JSON, which is also the at-rest format in Redis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: DbId,
    /// The literal refresh-token string, compared verbatim during renewal.
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    /// Forced-revocation flag. Nothing in the default flows sets it, but a
    /// blocked session always refuses renewal.
    pub is_blocked: bool,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// Input for [`crate::store::SessionStore::create_session`].
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub user_id: DbId,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: Timestamp,
}
