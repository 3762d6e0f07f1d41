//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the input DTOs the stores accept.

pub mod password_reset;
pub mod task;
pub mod user;

pub use password_reset::{PasswordResetSession, UpsertPasswordReset};
pub use task::{CreateTask, Task, UpdateTask};
pub use user::{CreateUser, User, UserResponse};
