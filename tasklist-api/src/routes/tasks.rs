/// Task endpoints
///
/// Every handler here requires an authenticated principal (enforced by the
/// auth middleware layer) and delegates the actual policy decision to the
/// shared access-control layer.
///
/// # Endpoints
///
/// - `POST   /v1/tasks` - Create a task
/// - `GET    /v1/tasks` - List own tasks (status filter + pagination)
/// - `GET    /v1/tasks/public` - List all users' tasks
/// - `GET    /v1/tasks/by-status` - Status-only listing, unscoped
/// - `GET    /v1/tasks/:id` - Get one owned task
/// - `PUT    /v1/tasks/:id` - Partial update
/// - `DELETE /v1/tasks/:id` - Delete
/// - `POST   /v1/tasks/:id/complete` - Force status to Completed
///
/// # Listing query parameters
///
/// All three listing endpoints take the same query shape:
/// `?status=In%20Progress&skip=0&limit=10`. The status filter is applied
/// before `total` is computed, so `total` is the filtered count regardless
/// of the pagination window.

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::Principal,
    routes::validation_errors,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    models::task::{NewTask, Task, TaskChanges, TaskStatus},
    tasks::{self, ListParams, TaskPage},
};
use validator::Validate;

fn default_limit() -> i64 {
    10
}

/// Query parameters shared by the listing endpoints
///
/// The transport layer owns skip/limit range validation; the access layer
/// may assume `skip >= 0` and `limit >= 1` were already checked.
#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    /// Optional status filter
    pub status: Option<TaskStatus>,

    /// Rows to skip (default 0)
    #[serde(default)]
    #[validate(range(min = 0, message = "skip must be non-negative"))]
    pub skip: i64,

    /// Maximum rows to return (default 10)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: i64,
}

impl ListQuery {
    fn into_params(self) -> ListParams {
        ListParams {
            status: self.status,
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// Create task request body
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (non-empty; the access layer enforces this domain rule)
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Delete confirmation body
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Fixed confirmation message
    pub message: String,
}

/// Create a new task owned by the principal
///
/// The new task starts in status `New`.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty title
/// - `500 Internal Server Error`: Storage failure
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = tasks::create(
        &state.db,
        principal.id,
        NewTask {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(task))
}

/// List the principal's own tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskPage>> {
    query.validate().map_err(validation_errors)?;

    let page = tasks::list_mine(&state.db, principal.id, query.into_params()).await?;
    Ok(Json(page))
}

/// List all users' tasks (public view)
///
/// The principal must be authenticated to reach this handler but is not
/// otherwise used; no ownership scoping is applied.
pub async fn list_public_tasks(
    State(state): State<AppState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskPage>> {
    query.validate().map_err(validation_errors)?;

    let page = tasks::list_public(&state.db, query.into_params()).await?;
    Ok(Json(page))
}

/// Status-only listing, unscoped by ownership
///
/// Mirrors the public listing's visibility.
pub async fn list_tasks_by_status(
    State(state): State<AppState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskPage>> {
    query.validate().map_err(validation_errors)?;

    let page = tasks::list_by_status(&state.db, query.into_params()).await?;
    Ok(Json(page))
}

/// Get a single owned task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID exists
/// - `403 Forbidden`: The task exists but belongs to someone else
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = tasks::get(&state.db, task_id, principal.id).await?;
    Ok(Json(task))
}

/// Apply a partial update to an owned task
///
/// Only fields present in the body are changed; absent fields are left
/// untouched. A present-but-empty title is rejected.
///
/// # Errors
///
/// - `404 Not Found` / `403 Forbidden`: per the ownership resolution
/// - `422 Unprocessable Entity`: Empty title
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
    Json(changes): Json<TaskChanges>,
) -> ApiResult<Json<Task>> {
    let task = tasks::update(&state.db, task_id, principal.id, changes).await?;
    Ok(Json(task))
}

/// Delete an owned task (hard delete)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    tasks::delete(&state.db, task_id, principal.id).await?;

    Ok(Json(DeleteResponse {
        message: "Task deleted".to_string(),
    }))
}

/// Force an owned task's status to `Completed`
///
/// Idempotent: completing an already completed task succeeds.
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = tasks::complete(&state.db, task_id, principal.id).await?;
    Ok(Json(task))
}
