//! HTTP-level tests for `/api/tasks` and `/api/users`.

mod common;

use axum::http::StatusCode;
use common::{
    authed_user, body_json, build_test_app, create_user, delete_auth, get_auth, patch_json_auth,
    post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::SqlitePool;
use taskboard_core::project::ProjectStatus;
use taskboard_db::repositories::ProjectRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_with_nested_assignee(pool: SqlitePool) {
    let (_me, token) = authed_user(&pool, "creator").await;
    let dev = create_user(&pool, "dev").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/tasks",
        json!({ "title": "Build login", "assignee_id": dev.id, "story_points": 3 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Build login");
    assert_eq!(json["status"], "todo");
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["story_points"], 3);
    assert_eq!(json["assignee"]["id"], dev.id);
    assert_eq!(json["assignee"]["username"], "dev");
    assert!(json["project"].is_null());
    assert!(json.get("assignee_id").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_validation(pool: SqlitePool) {
    let (_me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/tasks", json!({ "title": "" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "title");

    let response = post_json_auth(
        app.clone(),
        "/api/tasks",
        json!({ "title": "Negative", "story_points": -2 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "story_points");

    let response = post_json_auth(
        app.clone(),
        "/api/tasks",
        json!({ "title": "Overestimated", "story_points": 2_147_483_648_i64 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "story_points");

    let response = post_json_auth(
        app,
        "/api/tasks",
        json!({ "title": "Orphan", "project_id": 777 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_and_clearing_references(pool: SqlitePool) {
    let (me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool);

    let project = body_json(
        post_json_auth(app.clone(), "/api/projects", json!({ "name": "Home" }), &token).await,
    )
    .await;
    let task = body_json(
        post_json_auth(
            app.clone(),
            "/api/tasks",
            json!({
                "title": "Paint",
                "project_id": project["id"],
                "assignee_id": me.id,
                "due_date": "2026-11-30",
            }),
            &token,
        )
        .await,
    )
    .await;
    let uri = format!("/api/tasks/{}", task["id"]);
    assert_eq!(task["project"], project["id"]);
    assert_eq!(task["due_date"], "2026-11-30");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "in_progress", "assignee_id": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Paint");
    assert_eq!(json["status"], "in_progress");
    assert!(json["assignee"].is_null());
    assert_eq!(json["project"], project["id"]);
    assert_eq!(json["due_date"], "2026-11-30");

    let response = put_json_auth(app, &uri, json!({ "project_id": null }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["project"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_write_does_not_reconcile_project(pool: SqlitePool) {
    let (_me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool.clone());

    let project = body_json(
        post_json_auth(app.clone(), "/api/projects", json!({ "name": "Lazy" }), &token).await,
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();
    post_json_auth(
        app.clone(),
        "/api/tasks",
        json!({ "title": "Only", "project_id": project_id, "status": "done" }),
        &token,
    )
    .await;

    let stored = ProjectRepo::find_by_id(&pool, project_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ProjectStatus::Active);

    // The read path still renders it complete.
    let json = body_json(get_auth(app, &format!("/api/projects/{project_id}"), &token).await).await;
    assert_eq!(json["status"], "Completed");
    assert_eq!(json["progress"], 100.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_search_and_ordering(pool: SqlitePool) {
    let (me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool);

    for (title, status, due) in [
        ("Alpha", "todo", "2026-12-01"),
        ("Beta", "done", "2026-10-01"),
        ("Gamma", "todo", "2026-11-01"),
    ] {
        let response = post_json_auth(
            app.clone(),
            "/api/tasks",
            json!({ "title": title, "status": status, "due_date": due, "assignee_id": me.id }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let newest_first = body_json(get_auth(app.clone(), "/api/tasks", &token).await).await;
    assert_eq!(newest_first[0]["title"], "Gamma");

    let by_due = body_json(get_auth(app.clone(), "/api/tasks?ordering=due_date", &token).await).await;
    let titles: Vec<&str> = by_due
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Beta", "Gamma", "Alpha"]);

    let todo = body_json(get_auth(app.clone(), "/api/tasks?status=todo", &token).await).await;
    assert_eq!(todo.as_array().unwrap().len(), 2);

    let search = body_json(get_auth(app.clone(), "/api/tasks?search=amm", &token).await).await;
    assert_eq!(search.as_array().unwrap().len(), 1);
    assert_eq!(search[0]["title"], "Gamma");

    // Unknown ordering fields fall back to the default.
    let fallback =
        body_json(get_auth(app.clone(), "/api/tasks?ordering=password_hash", &token).await).await;
    assert_eq!(fallback[0]["title"], "Gamma");

    let page = body_json(get_auth(app, "/api/tasks?limit=1&offset=1", &token).await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["title"], "Beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_task(pool: SqlitePool) {
    let (_me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool);

    let task =
        body_json(post_json_auth(app.clone(), "/api/tasks", json!({ "title": "Bye" }), &token).await)
            .await;
    let uri = format!("/api/tasks/{}", task["id"]);

    assert_eq!(
        delete_auth(app.clone(), &uri, &token).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        get_auth(app.clone(), &uri, &token).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        delete_auth(app, &uri, &token).await.status(),
        StatusCode::NOT_FOUND
    );
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_are_listed_by_id(pool: SqlitePool) {
    let (first, token) = authed_user(&pool, "zed").await;
    let second = create_user(&pool, "amy").await;
    let app = build_test_app(pool);

    let users = body_json(get_auth(app.clone(), "/api/users", &token).await).await;
    assert_eq!(users[0]["id"], first.id);
    assert_eq!(users[1]["id"], second.id);
    assert!(users[0].get("password_hash").is_none());

    let one = body_json(get_auth(app.clone(), &format!("/api/users/{}", second.id), &token).await)
        .await;
    assert_eq!(one["username"], "amy");
    assert_eq!(one["first_name"], "Test");

    let response = get_auth(app, "/api/users/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_largest_estimates_keep_project_readable(pool: SqlitePool) {
    let (_me, token) = authed_user(&pool, "creator").await;
    let app = build_test_app(pool);

    let project = body_json(
        post_json_auth(app.clone(), "/api/projects", json!({ "name": "Epic" }), &token).await,
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();

    for status in ["done", "todo"] {
        let response = post_json_auth(
            app.clone(),
            "/api/tasks",
            json!({
                "title": "Max",
                "project_id": project_id,
                "status": status,
                "story_points": 2_147_483_647_i64,
            }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json_auth(
        app.clone(),
        "/api/tasks",
        json!({ "title": "Overflow", "project_id": project_id, "story_points": i64::MAX }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, &format!("/api/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["progress"], 50.0);
}
