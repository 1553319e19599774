//! Handlers for the `/tasks` resource.
//!
//! Task writes only touch the task row; the owning project's status is
//! reconciled on the next project write, not here.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskboard_core::error::CoreError;
use taskboard_core::task::{TaskPriority, TaskStatus, MAX_TITLE_LENGTH};
use taskboard_core::types::{Date, DbId, Timestamp};
use taskboard_core::validation::{validate_count, validate_required_text};
use taskboard_db::models::task::{CreateTask, Task, TaskListParams, UpdateTask};
use taskboard_db::models::user::UserSummary;
use taskboard_db::repositories::{TaskRepo, UserRepo};
use taskboard_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Task representation with the assignee expanded.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee: Option<UserSummary>,
    pub project: Option<DbId>,
    pub priority: TaskPriority,
    pub story_points: i64,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TaskResponse {
    fn new(task: Task, assignee: Option<UserSummary>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            assignee,
            project: task.project_id,
            priority: task.priority,
            story_points: task.story_points,
            start_date: task.start_date,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Expand a batch of tasks, loading all assignees in one query.
pub async fn render_tasks(pool: &DbPool, tasks: Vec<Task>) -> Result<Vec<TaskResponse>, sqlx::Error> {
    let mut ids: Vec<DbId> = tasks.iter().filter_map(|t| t.assignee_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let users: HashMap<DbId, UserSummary> = UserRepo::find_summaries(pool, &ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(tasks
        .into_iter()
        .map(|task| {
            let assignee = task.assignee_id.and_then(|id| users.get(&id).cloned());
            TaskResponse::new(task, assignee)
        })
        .collect())
}

async fn render_task(pool: &DbPool, task: Task) -> Result<TaskResponse, sqlx::Error> {
    let assignee = match task.assignee_id {
        Some(id) => UserRepo::find_summary(pool, id).await?,
        None => None,
    };
    Ok(TaskResponse::new(task, assignee))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateTask) -> Result<(), CoreError> {
    validate_required_text("title", &input.title, MAX_TITLE_LENGTH)?;
    validate_count("story_points", input.story_points)
}

fn validate_update(input: &UpdateTask) -> Result<(), CoreError> {
    if let Some(title) = &input.title {
        validate_required_text("title", title, MAX_TITLE_LENGTH)?;
    }
    validate_count("story_points", input.story_points)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    validate_create(&input)?;
    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::debug!(task_id = task.id, project_id = ?task.project_id, "Created task");
    Ok((StatusCode::CREATED, Json(render_task(&state.pool, task).await?)))
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = TaskRepo::list(&state.pool, &params).await?;
    Ok(Json(render_tasks(&state.pool, tasks).await?))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskResponse>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    Ok(Json(render_task(&state.pool, task).await?))
}

/// PUT /api/tasks/{id} and PATCH /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<TaskResponse>> {
    validate_update(&input)?;
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    Ok(Json(render_task(&state.pool, task).await?))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Task", id))
    }
}
