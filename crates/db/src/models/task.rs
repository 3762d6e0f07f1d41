//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskdeck_core::types::{DbId, Timestamp};

/// Full task row from the `tasks` table.
///
/// Serializes with camelCase keys (`isDone`, `ownerId`, `createdAt`), which
/// is the wire format task clients consume.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub body: String,
    pub is_done: bool,
    pub owner_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a new task. New tasks always start not-done.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub owner_id: DbId,
    pub body: String,
}

/// DTO for updating a task. Both `id` and `owner_id` scope the write, so a
/// non-owner update matches zero rows.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub id: DbId,
    pub owner_id: DbId,
    pub body: String,
    pub is_done: bool,
}
