//! PostgreSQL repositories.
//!
//! Each repository wraps a `PgPool` and implements the corresponding trait
//! from [`crate::store`]. Queries are hand-written SQL sharing a `COLUMNS`
//! constant per table so select lists stay consistent.

pub mod password_reset_repo;
pub mod task_repo;
pub mod user_repo;

pub use password_reset_repo::PgPasswordResetStore;
pub use task_repo::PgTaskStore;
pub use user_repo::PgUserStore;
