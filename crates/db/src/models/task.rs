//! Task entity model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::nullable;
use taskboard_core::progress::TaskWeight;
use taskboard_core::task::{TaskPriority, TaskStatus};
use taskboard_core::types::{Date, DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub assignee_id: Option<DbId>,
    pub project_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub story_points: i64,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Progress inputs for one task, keyed by its project.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectTaskWeight {
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub story_points: i64,
}

impl ProjectTaskWeight {
    pub fn weight(&self) -> TaskWeight {
        TaskWeight::new(self.status, self.story_points)
    }
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `todo` if omitted.
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<DbId>,
    pub project_id: Option<DbId>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<TaskPriority>,
    /// Defaults to 0 if omitted.
    pub story_points: Option<i64>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
}

/// DTO for updating an existing task. All fields are optional.
///
/// Nullable references and dates use `Option<Option<_>>`: an explicit `null`
/// clears the column, an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub assignee_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub project_id: Option<Option<DbId>>,
    pub priority: Option<TaskPriority>,
    pub story_points: Option<i64>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub due_date: Option<Option<Date>>,
}

/// Query parameters accepted by the task list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<TaskStatus>,
    pub assignee: Option<DbId>,
    pub project: Option<DbId>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
