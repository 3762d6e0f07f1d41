//! Password-reset session model and DTO.

use sqlx::FromRow;
use taskdeck_core::types::Timestamp;

/// A pending password-reset request.
///
/// Keyed by email: at most one live reset session exists per user, and a
/// repeated request overwrites the previous code and deadline.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetSession {
    pub email: String,
    pub otp: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating or refreshing a reset session.
#[derive(Debug, Clone)]
pub struct UpsertPasswordReset {
    pub email: String,
    pub otp: String,
    pub expires_at: Timestamp,
}
