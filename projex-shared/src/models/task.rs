/// Task model and database operations
///
/// Tasks belong to a project, carry an optional assignee, and track a status.
///
/// # Status model
///
/// ```text
/// TODO ⇄ IN_PROGRESS ⇄ DONE
/// ```
///
/// Transitions are deliberately unrestricted: any status may move to any
/// other (DONE → TODO included). This is a product decision for a
/// lightweight tracker, not a missing guard. Every update refreshes
/// `updated_at`; reporting uses `updated_at - created_at` as the time to
/// completion for tasks currently in DONE.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'TODO',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id UUID REFERENCES users(id),
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
///
/// A closed three-state enumeration. There is no IN_REVIEW state; anything
/// the board does not know is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not yet started (default for new tasks)
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Whether a direct move to `target` is allowed
    ///
    /// Always true: the board is any-to-any by design, so this exists only
    /// to make the decision explicit at call sites.
    pub fn can_transition_to(&self, _target: TaskStatus) -> bool {
        true
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task record
///
/// Wire format is camelCase (`projectId`, `assigneeId`, `ownerId`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// Assigned user, if any
    pub assignee_id: Option<Uuid>,

    /// User who created the task
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (refreshed on every status change)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (TODO unless the client says otherwise)
    pub status: TaskStatus,

    /// Project the task belongs to; the handler verifies it exists first
    pub project_id: Uuid,

    /// Optional assignee
    pub assignee_id: Option<Uuid>,

    /// Creator, resolved from the authenticated caller
    pub owner_id: Uuid,
}

/// Input for updating a task
///
/// Only non-None fields are written; the status accepts any value
/// regardless of the current one.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, project_id, assignee_id, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, project_id, assignee_id, owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .bind(data.assignee_id)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, owner_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, owner_id,
                   created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in a project, newest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, owner_id,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks a user is assigned to or created, newest first
    ///
    /// Used by the caller's composite profile read.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, assignee_id, owner_id,
                   created_at, updated_at
            FROM tasks
            WHERE assignee_id = $1 OR owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks referencing a user as assignee or owner
    ///
    /// User deletion is refused while this is non-zero.
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE assignee_id = $1 OR owner_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates a task, writing only the provided fields
    ///
    /// `updated_at` is always refreshed, which is what reporting relies on
    /// for "time to completion".
    ///
    /// # Returns
    ///
    /// The updated task, or None if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, project_id, assignee_id, \
             owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the task did not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
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
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "TODO");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Done.as_str(), "DONE");
    }

    #[test]
    fn test_status_default_is_todo() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );

        let status: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        // IN_REVIEW never became a real state.
        assert!(serde_json::from_str::<TaskStatus>("\"IN_REVIEW\"").is_err());
    }

    #[test]
    fn test_any_to_any_transitions_allowed() {
        let all = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

        for from in all {
            for to in all {
                assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.status.is_none());
        assert!(update.assignee_id.is_none());
    }
}
