/// Primary-key type; the schema uses BIGSERIAL throughout.
pub type DbId = i64;

/// Timestamps are stored and compared in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
