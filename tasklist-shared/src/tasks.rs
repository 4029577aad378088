/// Task access control and query composition
///
/// This module is the policy layer between the HTTP surface and the task
/// store. Every operation takes the acting principal's user ID and decides,
/// for the (principal, task) pair, whether the operation is permitted and
/// how listings compose with ownership scoping.
///
/// # Resolve-and-authorize
///
/// Mutations and private reads go through [`resolve_owned`], which fetches
/// the task by ID alone and only then checks ownership. The ordering is a
/// contract:
///
/// 1. Task does not exist → [`TaskError::NotFound`], no matter who asks.
/// 2. Task exists but belongs to someone else → [`TaskError::Forbidden`],
///    never `NotFound`.
///
/// A non-owner probing an ID can therefore learn that the task exists.
/// That leak is an accepted tradeoff of this design, not an oversight, and
/// the integration tests assert on it.
///
/// # Listings
///
/// Listing operations return a [`TaskPage`]. The status filter (when
/// present) is applied to the base query before `total` is computed and
/// before skip/limit, so `total` is always the filtered, pre-pagination
/// count. Rows come back in `id` ascending order.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::tasks::{self, ListParams};
/// use tasklist_shared::models::task::TaskStatus;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, principal_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let page = tasks::list_mine(&pool, principal_id, ListParams {
///     status: Some(TaskStatus::New),
///     skip: 0,
///     limit: 10,
/// }).await?;
/// println!("{} matching tasks, showing {}", page.total, page.items.len());
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::PgPool;

use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The referenced task does not exist
    #[error("Task not found")]
    NotFound,

    /// The task exists but the principal does not own it
    #[error("Not authorized to access this task")]
    Forbidden,

    /// A required title was empty
    #[error("Title must not be empty")]
    EmptyTitle,

    /// The underlying store operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Listing parameters shared by every listing operation
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    /// Optional status filter, applied before counting and pagination
    pub status: Option<TaskStatus>,

    /// Rows to skip (must already be validated as >= 0 by the caller)
    pub skip: i64,

    /// Maximum rows to return (must already be validated as >= 1)
    pub limit: i64,
}

/// One page of a filtered, offset/limit listing
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    /// Count of all rows matching the filter, before pagination
    pub total: i64,

    /// Offset that produced this page
    pub skip: i64,

    /// Limit that produced this page
    pub limit: i64,

    /// The rows in this window, ordered by id ascending
    pub items: Vec<Task>,
}

/// Fetches a task and verifies the principal owns it
///
/// Existence is checked strictly before ownership: a missing task is
/// `NotFound` even for a non-owner, and an existing task owned by someone
/// else is `Forbidden`, never `NotFound`.
///
/// The task is re-fetched on every call; nothing is cached across requests,
/// so ownership decisions never act on stale rows.
pub async fn resolve_owned(
    pool: &PgPool,
    task_id: i64,
    principal_id: i64,
) -> Result<Task, TaskError> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(TaskError::NotFound)?;

    if task.user_id != principal_id {
        tracing::debug!(
            task_id,
            owner_id = task.user_id,
            principal_id,
            "Ownership check failed"
        );
        return Err(TaskError::Forbidden);
    }

    Ok(task)
}

/// Creates a task owned by the principal
///
/// Title non-emptiness is a domain rule, so it is re-validated here even
/// though the HTTP surface checks request shape.
pub async fn create(pool: &PgPool, principal_id: i64, data: NewTask) -> Result<Task, TaskError> {
    if data.title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }

    let task = Task::create(pool, principal_id, data).await?;

    tracing::debug!(task_id = task.id, user_id = principal_id, "Task created");
    Ok(task)
}

/// Returns a single task owned by the principal
pub async fn get(pool: &PgPool, task_id: i64, principal_id: i64) -> Result<Task, TaskError> {
    resolve_owned(pool, task_id, principal_id).await
}

/// Lists the principal's own tasks
pub async fn list_mine(
    pool: &PgPool,
    principal_id: i64,
    params: ListParams,
) -> Result<TaskPage, TaskError> {
    page(pool, Some(principal_id), params).await
}

/// Lists all users' tasks (public view)
///
/// The principal must be authenticated to reach this operation but is not
/// otherwise used: no owner scoping is applied.
pub async fn list_public(pool: &PgPool, params: ListParams) -> Result<TaskPage, TaskError> {
    page(pool, None, params).await
}

/// Status-only listing with no ownership scope
///
/// Mirrors [`list_public`]'s unscoped visibility; kept as a distinct
/// operation because the API exposes it as its own endpoint.
pub async fn list_by_status(pool: &PgPool, params: ListParams) -> Result<TaskPage, TaskError> {
    page(pool, None, params).await
}

/// Applies a partial update to a task owned by the principal
///
/// Only fields present in `changes` are applied; absent fields are left
/// untouched, and a body with no fields at all returns the task unchanged
/// without touching the store. A present-but-empty title is rejected
/// before any store mutation. The update itself is a single statement, so
/// a storage failure leaves the row exactly as it was.
pub async fn update(
    pool: &PgPool,
    task_id: i64,
    principal_id: i64,
    changes: TaskChanges,
) -> Result<Task, TaskError> {
    let current = resolve_owned(pool, task_id, principal_id).await?;

    // An all-absent body is a no-op; skip the store round trip
    if changes.is_empty() {
        return Ok(current);
    }

    if let Some(title) = &changes.title {
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
    }

    let task = Task::apply_changes(pool, task_id, changes)
        .await?
        .ok_or(TaskError::NotFound)?;

    Ok(task)
}

/// Deletes a task owned by the principal
pub async fn delete(pool: &PgPool, task_id: i64, principal_id: i64) -> Result<(), TaskError> {
    resolve_owned(pool, task_id, principal_id).await?;

    let deleted = Task::delete(pool, task_id).await?;
    if !deleted {
        return Err(TaskError::NotFound);
    }

    tracing::debug!(task_id, user_id = principal_id, "Task deleted");
    Ok(())
}

/// Forces a task owned by the principal to `Completed`
///
/// Idempotent: completing an already completed task succeeds and returns
/// the task unchanged.
pub async fn complete(pool: &PgPool, task_id: i64, principal_id: i64) -> Result<Task, TaskError> {
    resolve_owned(pool, task_id, principal_id).await?;

    let task = Task::mark_completed(pool, task_id)
        .await?
        .ok_or(TaskError::NotFound)?;

    Ok(task)
}

/// Composes one page: filtered count first, then the offset/limit window
///
/// Both queries see the same owner/status filters, which is what keeps
/// `total` independent of `skip` and `limit`.
async fn page(
    pool: &PgPool,
    owner: Option<i64>,
    params: ListParams,
) -> Result<TaskPage, TaskError> {
    let total = Task::count(pool, owner, params.status).await?;
    let items = Task::list(pool, owner, params.status, params.skip, params.limit).await?;

    Ok(TaskPage {
        total,
        skip: params.skip,
        limit: params.limit,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        assert_eq!(TaskError::NotFound.to_string(), "Task not found");
        assert_eq!(
            TaskError::Forbidden.to_string(),
            "Not authorized to access this task"
        );
        assert_eq!(TaskError::EmptyTitle.to_string(), "Title must not be empty");
    }

    #[test]
    fn test_list_params_default() {
        let params = ListParams::default();
        assert!(params.status.is_none());
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 0);
    }

    #[test]
    fn test_task_page_serializes_all_fields() {
        let page = TaskPage {
            total: 12,
            skip: 2,
            limit: 5,
            items: vec![],
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total"], 12);
        assert_eq!(json["skip"], 2);
        assert_eq!(json["limit"], 5);
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
