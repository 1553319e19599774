//! Handlers for the `/projects` resource.
//!
//! Every project write passes through the status rules in
//! [`crate::engine::project_status`]: updates are guarded before they are
//! persisted, and both creates and updates are reconciled afterwards.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskboard_core::error::CoreError;
use taskboard_core::progress::{compute_progress, displayed_status, ProjectWrite};
use taskboard_core::project::{ProjectPriority, ProjectStatus, MAX_CATEGORY_LENGTH, MAX_NAME_LENGTH};
use taskboard_core::types::{Date, DbId, Timestamp};
use taskboard_core::validation::{validate_max_length, validate_required_text};
use taskboard_db::models::project::{CreateProject, Project, ProjectListParams, UpdateProject};
use taskboard_db::repositories::{ProjectRepo, TaskRepo};
use taskboard_db::DbPool;

use crate::engine::project_status;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Project representation with derived progress.
///
/// `status` is the displayed status, which follows progress even when the
/// stored value lags behind.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub category: String,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub starred: bool,
    pub team: Vec<serde_json::Value>,
    pub progress: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectResponse {
    fn new(project: Project, progress: f64) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: displayed_status(project.status, progress),
            priority: project.priority,
            category: project.category,
            start_date: project.start_date,
            due_date: project.due_date,
            starred: project.starred,
            team: project.team,
            progress,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

async fn render_project(pool: &DbPool, project: Project) -> Result<ProjectResponse, sqlx::Error> {
    let progress = project_status::project_progress(pool, project.id).await?;
    Ok(ProjectResponse::new(project, progress))
}

/// Apply reconciliation after a committed write, keeping the written row
/// if reconciliation itself fails.
async fn reconcile_after_write(pool: &DbPool, project: Project, write: ProjectWrite) -> Project {
    let project_id = project.id;
    let fallback = project.clone();
    match project_status::reconcile(pool, project, write).await {
        Ok(reconciled) => reconciled,
        Err(e) => {
            tracing::warn!(project_id, error = %e, "Project status reconciliation failed");
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateProject) -> Result<(), CoreError> {
    validate_required_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_max_length("category", input.category.as_deref(), MAX_CATEGORY_LENGTH)
}

fn validate_update(input: &UpdateProject) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        validate_required_text("name", name, MAX_NAME_LENGTH)?;
    }
    validate_max_length("category", input.category.as_deref(), MAX_CATEGORY_LENGTH)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    validate_create(&input)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, name = %project.name, "Created project");

    let project = reconcile_after_write(&state.pool, project, ProjectWrite::Create).await;
    Ok((
        StatusCode::CREATED,
        Json(render_project(&state.pool, project).await?),
    ))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = ProjectRepo::list(&state.pool, &params).await?;

    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let weights = TaskRepo::weights_for_projects(&state.pool, &ids).await?;

    let body = projects
        .into_iter()
        .map(|project| {
            let progress = weights
                .get(&project.id)
                .map_or(0.0, |w| compute_progress(w));
            ProjectResponse::new(project, progress)
        })
        .collect();
    Ok(Json(body))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(render_project(&state.pool, project).await?))
}

/// PUT /api/projects/{id} and PATCH /api/projects/{id}
///
/// Rejects `status: "Completed"` with 400 while the project's tasks are
/// below 100%; nothing is written in that case.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectResponse>> {
    validate_update(&input)?;

    if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Project", id));
    }
    project_status::check_completion(&state.pool, id, input.status).await?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    let write = ProjectWrite::Update {
        requested_status: input.status,
    };
    let project = reconcile_after_write(&state.pool, project, write).await;
    Ok(Json(render_project(&state.pool, project).await?))
}

/// DELETE /api/projects/{id}
///
/// Tasks and team members of the project are kept and detached.
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Deleted project");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}
