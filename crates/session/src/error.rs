//! Error type shared by session store implementations.

/// Failure conditions a session store operation can report.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// The session does not exist, or existed and has expired.
    #[error("token session not found")]
    NotFound,

    /// The stored record could not be encoded or decoded.
    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Any other backend failure. The message is for logs, not clients.
    #[error("session store error: {0}")]
    Backend(String),
}

impl SessionStoreError {
    /// Wrap a backend error, keeping only its display form.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        SessionStoreError::Backend(err.to_string())
    }
}
