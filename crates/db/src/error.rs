//! Error type shared by all store implementations.

/// Failure conditions a store operation can report.
///
/// Postgres repositories classify `sqlx` errors into these variants so that
/// callers can branch on constraint violations without knowing the backend;
/// the in-memory store constructs them directly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the lookup.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A unique constraint rejected the write (e.g. duplicate email).
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key constraint rejected the write (e.g. unknown email).
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Any other backend failure. The message is for logs, not clients.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Classify a raw sqlx error into a [`StoreError`].
    ///
    /// PostgreSQL error codes: `23505` unique violation, `23503` foreign key
    /// violation. Everything else is reported as an opaque database error.
    pub fn from_sqlx(err: sqlx::Error, entity: &'static str) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound { entity },
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.code().as_deref() {
                    Some("23505") => StoreError::UniqueViolation { constraint },
                    Some("23503") => StoreError::ForeignKeyViolation { constraint },
                    _ => {
                        tracing::error!(error = %db_err, "Database error");
                        StoreError::Database(db_err.to_string())
                    }
                }
            }
            other => {
                tracing::error!(error = %other, "Database error");
                StoreError::Database(other.to_string())
            }
        }
    }
}
