//! Project entity model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::nullable;
use taskboard_core::project::{ProjectPriority, ProjectStatus};
use taskboard_core::types::{Date, DbId, Timestamp};

/// A project row from the `projects` table.
///
/// `status` is the stored value; what clients see also depends on progress,
/// which is not a column.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    #[sqlx(try_from = "String")]
    pub priority: ProjectPriority,
    pub category: String,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub starred: bool,
    #[sqlx(json)]
    pub team: Vec<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `Active` if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<ProjectPriority>,
    pub category: Option<String>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub starred: Option<bool>,
    pub team: Option<Vec<serde_json::Value>>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `status` being `Some` means the client explicitly asked for that status
/// in this write.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub due_date: Option<Option<Date>>,
    pub starred: Option<bool>,
    pub team: Option<Vec<serde_json::Value>>,
}

/// Query parameters accepted by the project list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListParams {
    pub starred: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
