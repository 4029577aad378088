/// Task model and database operations
///
/// This module provides the Task model and the store-level queries behind
/// the task listing and mutation operations. Access-control decisions live
/// in the `tasks` module at the crate root; everything here is plain
/// storage with no ownership policy attached.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('new', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'new',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::task::{NewTask, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, user_id, NewTask {
///     title: "Write report".to_string(),
///     description: Some("Quarterly numbers".to_string()),
/// }).await?;
/// assert_eq!(task.user_id, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task status
///
/// The single canonical status enumeration, shared by the store layer and
/// the API schema. Database values are snake_case (`new`, `in_progress`,
/// `completed`); JSON wire values are the human-readable forms
/// (`"New"`, `"In Progress"`, `"Completed"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Freshly created, not started
    #[serde(rename = "New")]
    New,

    /// Work has begun
    #[serde(rename = "In Progress")]
    InProgress,

    /// Finished
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Converts status to its database string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model representing one unit of work
///
/// Every task has exactly one owner, and the owner never changes after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (store-assigned, immutable)
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Title (required, non-empty)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial update for a task
///
/// All fields are optional. Only `Some` fields are applied; `None` fields
/// leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// True when no field is set (the update would be a no-op)
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `user_id`, with status defaulting to `New`
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a missing owner row).
    pub async fn create(pool: &PgPool, user_id: i64, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with no owner filter
    ///
    /// The ownership decision is made by the caller; fetching by ID alone
    /// is what lets the access layer distinguish a missing task from a
    /// task owned by someone else.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks with optional owner and status filters
    ///
    /// Both filters are applied before skip/limit. Rows are ordered by `id`
    /// ascending so that pagination windows are stable and deterministic.
    pub async fn list(
        pool: &PgPool,
        owner: Option<i64>,
        status: Option<TaskStatus>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
              AND ($2::task_status IS NULL OR status = $2)
            ORDER BY id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(status)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks matching the same filters as [`Task::list`]
    ///
    /// The count is taken before pagination, so a page's `total` reflects
    /// every matching row, not just the window returned.
    pub async fn count(
        pool: &PgPool,
        owner: Option<i64>,
        status: Option<TaskStatus>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
              AND ($2::task_status IS NULL OR status = $2)
            "#,
        )
        .bind(owner)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Applies a partial update in a single statement
    ///
    /// Absent fields fall back to the stored value via COALESCE, so either
    /// the whole update commits or nothing changes.
    pub async fn apply_changes(
        pool: &PgPool,
        id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Forces a task's status to `Completed`
    ///
    /// Idempotent: completing an already completed task is not an error and
    /// returns the task in the same state.
    pub async fn mark_completed(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'completed',
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task (hard delete)
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::New.as_str(), "new");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_wire_format() {
        assert_eq!(serde_json::to_string(&TaskStatus::New).unwrap(), "\"New\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }

    #[test]
    fn test_task_status_wire_roundtrip() {
        let status: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);

        let err = serde_json::from_str::<TaskStatus>("\"in_progress\"");
        assert!(err.is_err(), "database form is not a valid wire value");
    }

    #[test]
    fn test_task_changes_is_empty() {
        assert!(TaskChanges::default().is_empty());

        let changes = TaskChanges {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
