//! Handlers for the `/team-members` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskboard_core::error::CoreError;
use taskboard_core::team::{MemberStatus, TeamRole, MAX_DEPARTMENT_LENGTH, MAX_MEMBER_NAME_LENGTH};
use taskboard_core::types::{DbId, Timestamp};
use taskboard_core::validation::{
    validate_count, validate_email, validate_max_length, validate_required_text,
};
use taskboard_db::models::team_member::{
    CreateTeamMember, TeamMember, TeamMemberListParams, UpdateTeamMember,
};
use taskboard_db::repositories::TeamMemberRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Team member representation with the project name denormalised.
#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: TeamRole,
    pub department: String,
    pub project: Option<DbId>,
    pub project_name: Option<String>,
    pub status: MemberStatus,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TeamMember> for TeamMemberResponse {
    fn from(m: TeamMember) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            department: m.department,
            project: m.project_id,
            project_name: m.project_name,
            status: m.status,
            total_tasks: m.total_tasks,
            completed_tasks: m.completed_tasks,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_counts(total: Option<i64>, completed: Option<i64>) -> Result<(), CoreError> {
    validate_count("total_tasks", total)?;
    validate_count("completed_tasks", completed)
}

fn validate_create(input: &CreateTeamMember) -> Result<(), CoreError> {
    validate_required_text("name", &input.name, MAX_MEMBER_NAME_LENGTH)?;
    validate_email("email", &input.email)?;
    validate_max_length("department", input.department.as_deref(), MAX_DEPARTMENT_LENGTH)?;
    validate_counts(input.total_tasks, input.completed_tasks)
}

fn validate_update(input: &UpdateTeamMember) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        validate_required_text("name", name, MAX_MEMBER_NAME_LENGTH)?;
    }
    if let Some(email) = &input.email {
        validate_email("email", email)?;
    }
    validate_max_length("department", input.department.as_deref(), MAX_DEPARTMENT_LENGTH)?;
    validate_counts(input.total_tasks, input.completed_tasks)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/team-members
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<(StatusCode, Json<TeamMemberResponse>)> {
    validate_create(&input)?;
    let member = TeamMemberRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// GET /api/team-members
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TeamMemberListParams>,
) -> AppResult<Json<Vec<TeamMemberResponse>>> {
    let members = TeamMemberRepo::list(&state.pool, &params).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// GET /api/team-members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TeamMemberResponse>> {
    let member = TeamMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("TeamMember", id))?;
    Ok(Json(member.into()))
}

/// PUT /api/team-members/{id} and PATCH /api/team-members/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<Json<TeamMemberResponse>> {
    validate_update(&input)?;
    let member = TeamMemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("TeamMember", id))?;
    Ok(Json(member.into()))
}

/// DELETE /api/team-members/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TeamMemberRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("TeamMember", id))
    }
}
