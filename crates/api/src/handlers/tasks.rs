//! Handlers for the `/task` resource (bearer-protected, owner-scoped CRUD).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskdeck_core::types::DbId;
use taskdeck_db::models::task::Task;

use crate::error::{AppError, AppResult};
use crate::handlers::MessageResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::tasks::DEFAULT_PAGE_SIZE;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /task`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub body: String,
}

/// Request body for `PUT /task/{id}`. A missing `isDone` reads as false.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub body: String,
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
}

/// Query parameters for `GET /task` (`?pageId=1&limit=10`).
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(rename = "pageId")]
    pub page_id: Option<i64>,
    pub limit: Option<i64>,
}

/// Response body for `GET /task`.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /task
///
/// Create a task owned by the authenticated user. New tasks start not-done.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<Json<Task>> {
    if input.body.is_empty() {
        return Err(AppError::BadRequest("body is a required field".to_string()));
    }

    let task = state
        .tasks
        .create(auth_user.payload.user.id, input.body)
        .await?;

    tracing::info!(task_id = task.id, owner_id = task.owner_id, "Task created");
    Ok(Json(task))
}

/// GET /task/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let task = state.tasks.get(id, auth_user.payload.user.id).await?;
    Ok(Json(task))
}

/// GET /task?pageId=1&limit=10
///
/// List the authenticated user's tasks. `pageId` is 1-indexed; absent
/// parameters default to page 1 with 10 tasks.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ListTasksQuery>,
) -> AppResult<Json<TaskListResponse>> {
    let page_id = query.page_id.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let tasks = state
        .tasks
        .list(auth_user.payload.user.id, page_id, limit)
        .await?;

    Ok(Json(TaskListResponse { tasks }))
}

/// PUT /task/{id}
///
/// Replace the task's body and done flag.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    if input.body.is_empty() {
        return Err(AppError::BadRequest("body is a required field".to_string()));
    }

    let task = state
        .tasks
        .update(id, auth_user.payload.user.id, input.body, input.is_done)
        .await?;

    Ok(Json(task))
}

/// DELETE /task/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    state.tasks.delete(id, auth_user.payload.user.id).await?;

    tracing::info!(task_id = id, "Task deleted");
    Ok(Json(MessageResponse {
        message: format!("delete task id {id} success"),
    }))
}
