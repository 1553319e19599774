//! HTTP-level tests for `/api/projects`: derived progress, the completion
//! guard and post-write status reconciliation.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    authed_user, body_json, build_test_app, delete_auth, get_auth, patch_json_auth,
    post_json_auth, put_json_auth,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use taskboard_core::progress::COMPLETION_GUARD_MESSAGE;
use taskboard_core::project::ProjectStatus;
use taskboard_db::repositories::{ProjectRepo, TaskRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_project(app: &Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_task(app: &Router, token: &str, project_id: i64, status: &str, sp: i64) -> i64 {
    let body = json!({
        "title": format!("{status} task"),
        "project_id": project_id,
        "status": status,
        "story_points": sp,
    });
    let response = post_json_auth(app.clone(), "/api/tasks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn fetch_project(app: &Router, token: &str, id: i64) -> Value {
    let response = get_auth(app.clone(), &format!("/api/projects/{id}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn stored_status(pool: &SqlitePool, id: i64) -> ProjectStatus {
    ProjectRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .expect("project should exist")
        .status
}

async fn set_task_status(app: &Router, token: &str, task_id: i64, status: &str) {
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/tasks/{task_id}"),
        json!({ "status": status }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// CRUD and representation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_defaults(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let json = create_project(&app, &token, json!({ "name": "Website" })).await;

    assert_eq!(json["name"], "Website");
    assert_eq!(json["status"], "Active");
    assert_eq!(json["priority"], "Medium");
    assert_eq!(json["starred"], false);
    assert_eq!(json["team"], json!([]));
    assert_eq!(json["progress"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_validation(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/projects", json!({ "name": "  " }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "name");

    let long_category = "x".repeat(129);
    let response = post_json_auth(
        app.clone(),
        "/api/projects",
        json!({ "name": "Ok", "category": long_category }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "category");

    let response = post_json_auth(
        app,
        "/api/projects",
        json!({ "name": "Ok", "status": "Finished" }),
        &token,
    )
    .await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_project_is_404(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/projects/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_detaches_tasks(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Temporary" })).await;
    let id = project["id"].as_i64().unwrap();
    let task_id = create_task(&app, &token, id, "todo", 1).await;

    let response = delete_auth(app.clone(), &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let task = TaskRepo::find_by_id(&pool, task_id).await.unwrap().unwrap();
    assert_eq!(task.project_id, None);

    let response = delete_auth(app, &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_includes_progress_and_filters(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let busy = create_project(&app, &token, json!({ "name": "Busy", "starred": true })).await;
    let busy_id = busy["id"].as_i64().unwrap();
    create_task(&app, &token, busy_id, "done", 1).await;
    create_task(&app, &token, busy_id, "todo", 1).await;
    create_project(&app, &token, json!({ "name": "Idle", "priority": "Low" })).await;

    let response = get_auth(app.clone(), "/api/projects?ordering=created_at", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Busy");
    assert_eq!(list[0]["progress"], 50.0);
    assert_eq!(list[1]["progress"], 0.0);

    let starred = body_json(get_auth(app.clone(), "/api/projects?starred=true", &token).await).await;
    assert_eq!(starred.as_array().unwrap().len(), 1);

    // Search covers the priority column.
    let low = body_json(get_auth(app, "/api/projects?search=low", &token).await).await;
    assert_eq!(low.as_array().unwrap().len(), 1);
    assert_eq!(low[0]["name"], "Idle");
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_story_point_weighted_progress(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let project = create_project(&app, &token, json!({ "name": "Weighted" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 3).await;
    create_task(&app, &token, id, "todo", 1).await;

    let json = fetch_project(&app, &token, id).await;
    assert_eq!(json["progress"], 75.0);
    assert_eq!(json["status"], "Active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_count_progress_without_story_points(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let project = create_project(&app, &token, json!({ "name": "Counted" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 0).await;
    create_task(&app, &token, id, "in_progress", 0).await;
    create_task(&app, &token, id, "todo", 0).await;

    assert_eq!(fetch_project(&app, &token, id).await["progress"], 50.0);
}

// ---------------------------------------------------------------------------
// Completion guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_task_project_created_completed_cannot_be_updated_to_completed(
    pool: SqlitePool,
) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    // Creates are not guarded.
    let project = create_project(
        &app,
        &token,
        json!({ "name": "Instant", "status": "Completed" }),
    )
    .await;
    let id = project["id"].as_i64().unwrap();
    assert_eq!(project["progress"], 0.0);
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);
    // Rendered status follows progress.
    assert_eq!(project["status"], "Active");

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "status": "Completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "status");
    assert_eq!(json["error"], COMPLETION_GUARD_MESSAGE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guard_rejects_partial_project_and_writes_nothing(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Forty" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 2).await;
    create_task(&app, &token, id, "todo", 3).await;
    assert_eq!(fetch_project(&app, &token, id).await["progress"], 40.0);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({ "status": "Completed", "name": "Renamed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, ProjectStatus::Active);
    assert_eq!(stored.name, "Forty");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guard_allows_completion_at_full_progress(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Done" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 0).await;

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "status": "Completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "Completed");
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_project_is_404_not_guard_error(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool);

    let response = patch_json_auth(
        app,
        "/api/projects/4242",
        json!({ "status": "Completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_promotes_complete_project(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "All done" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 5).await;
    create_task(&app, &token, id, "done", 8).await;

    // Task writes alone do not touch the stored status.
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Active);

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "status": "Active" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["progress"], 100.0);
    assert_eq!(json["status"], "Completed");
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_project_overrides_requested_on_hold(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Finished" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 1).await;

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "status": "On Hold" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reopened_task_demotes_completed_project_on_next_write(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Regressed" })).await;
    let id = project["id"].as_i64().unwrap();
    let task_id = create_task(&app, &token, id, "done", 0).await;

    patch_json_auth(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({ "status": "Completed" }),
        &token,
    )
    .await;
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);

    set_task_status(&app, &token, task_id, "todo").await;
    // Still stale in storage until the project is written again.
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "starred": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["progress"], 0.0);
    assert_eq!(json["status"], "Active");
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_explicit_on_hold_survives_demotion(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Paused" })).await;
    let id = project["id"].as_i64().unwrap();
    let task_id = create_task(&app, &token, id, "done", 0).await;

    patch_json_auth(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({ "status": "Completed" }),
        &token,
    )
    .await;
    set_task_status(&app, &token, task_id, "todo").await;

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "status": "On Hold" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "On Hold");
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::OnHold);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_consistent_project_keeps_updated_at(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Steady" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "in_progress", 2).await;

    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "description": "still going" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // No follow-up status write: the stored row matches the response.
    let stored = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, ProjectStatus::Active);
    assert_eq!(
        json["updated_at"],
        serde_json::to_value(stored.updated_at).unwrap()
    );
    assert_eq!(json["progress"], 50.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_keeps_requested_status_without_tasks(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    // A new project has no tasks yet, so nothing is promoted or demoted.
    let project = create_project(&app, &token, json!({ "name": "Fresh", "status": "On Hold" })).await;
    let id = project["id"].as_i64().unwrap();
    assert_eq!(project["status"], "On Hold");
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::OnHold);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_status_correction_keeps_the_update(pool: SqlitePool) {
    let (_user, token) = authed_user(&pool, "pm").await;
    let app = build_test_app(pool.clone());

    let project = create_project(&app, &token, json!({ "name": "Locked" })).await;
    let id = project["id"].as_i64().unwrap();
    create_task(&app, &token, id, "done", 3).await;

    // Any write that changes the stored status now fails.
    sqlx::query(
        "CREATE TRIGGER lock_project_status BEFORE UPDATE ON projects
         WHEN NEW.status IS NOT OLD.status
         BEGIN SELECT RAISE(ABORT, 'status is locked'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({ "description": "edited while locked" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], "edited while locked");
    assert_eq!(json["progress"], 100.0);

    let stored = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.description, "edited while locked");
    assert_eq!(stored.status, ProjectStatus::Active);

    // The next successful write catches up.
    sqlx::query("DROP TRIGGER lock_project_status")
        .execute(&pool)
        .await
        .unwrap();
    let response = patch_json_auth(
        app,
        &format!("/api/projects/{id}"),
        json!({ "starred": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stored_status(&pool, id).await, ProjectStatus::Completed);
}
