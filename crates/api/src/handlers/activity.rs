//! Handlers for the `/activities` resource.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskboard_core::activity::ActivityType;
use taskboard_core::error::CoreError;
use taskboard_core::types::{DbId, Timestamp};
use taskboard_db::models::activity::{Activity, ActivityListParams, CreateActivity, UpdateActivity};
use taskboard_db::models::user::UserSummary;
use taskboard_db::repositories::{ActivityRepo, TaskRepo, UserRepo};
use taskboard_db::DbPool;

use super::task::{render_tasks, TaskResponse};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Activity representation with the acting user and task expanded.
///
/// `meta` is stored but not rendered.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: DbId,
    pub user: Option<UserSummary>,
    pub task: Option<TaskResponse>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub message: String,
    pub created_at: Timestamp,
}

/// Expand a batch of activities, loading users and tasks in bulk.
pub async fn render_activities(
    pool: &DbPool,
    activities: Vec<Activity>,
) -> Result<Vec<ActivityResponse>, sqlx::Error> {
    let mut user_ids: Vec<DbId> = activities.iter().map(|a| a.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let mut task_ids: Vec<DbId> = activities.iter().filter_map(|a| a.task_id).collect();
    task_ids.sort_unstable();
    task_ids.dedup();

    let users: HashMap<DbId, UserSummary> = UserRepo::find_summaries(pool, &user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let tasks = TaskRepo::find_by_ids(pool, &task_ids).await?;
    let tasks: HashMap<DbId, TaskResponse> = render_tasks(pool, tasks)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(activities
        .into_iter()
        .map(|a| ActivityResponse {
            id: a.id,
            user: users.get(&a.user_id).cloned(),
            task: a.task_id.and_then(|id| tasks.get(&id).cloned()),
            activity_type: a.activity_type,
            message: a.message,
            created_at: a.created_at,
        })
        .collect())
}

async fn render_activity(pool: &DbPool, activity: Activity) -> Result<ActivityResponse, sqlx::Error> {
    let mut rendered = render_activities(pool, vec![activity]).await?;
    rendered.pop().ok_or(sqlx::Error::RowNotFound)
}

fn validate_message(message: &str) -> Result<(), CoreError> {
    if message.trim().is_empty() {
        return Err(CoreError::field("message", "This field may not be blank."));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/activities
///
/// The authenticated caller is recorded as the acting user.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateActivity>,
) -> AppResult<(StatusCode, Json<ActivityResponse>)> {
    validate_message(&input.message)?;
    let activity = ActivityRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::debug!(
        activity_id = activity.id,
        user_id = auth.user_id,
        activity_type = %activity.activity_type,
        "Recorded activity",
    );
    Ok((
        StatusCode::CREATED,
        Json(render_activity(&state.pool, activity).await?),
    ))
}

/// GET /api/activities
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ActivityListParams>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let activities = ActivityRepo::list(&state.pool, &params).await?;
    Ok(Json(render_activities(&state.pool, activities).await?))
}

/// GET /api/activities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActivityResponse>> {
    let activity = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Activity", id))?;
    Ok(Json(render_activity(&state.pool, activity).await?))
}

/// PUT /api/activities/{id} and PATCH /api/activities/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActivity>,
) -> AppResult<Json<ActivityResponse>> {
    if let Some(message) = &input.message {
        validate_message(message)?;
    }
    let activity = ActivityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Activity", id))?;
    Ok(Json(render_activity(&state.pool, activity).await?))
}

/// DELETE /api/activities/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ActivityRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Activity", id))
    }
}
