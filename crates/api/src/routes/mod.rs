pub mod activity;
pub mod auth;
pub mod health;
pub mod project;
pub mod recent;
pub mod task;
pub mod team_member;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout
///
/// /users                         list
/// /users/{id}                    get
///
/// /tasks                         list, create
/// /tasks/{id}                    get, update, delete
///
/// /activities                    list, create
/// /activities/{id}               get, update, delete
///
/// /projects                      list, create
/// /projects/{id}                 get, update, delete
///
/// /team-members                  list, create
/// /team-members/{id}             get, update, delete
///
/// /recent/work                   work_done feed
/// /recent/views                  view feed
/// /recent/search                 work_done + view search
/// ```
///
/// Everything except login and refresh requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/tasks", task::router())
        .nest("/activities", activity::router())
        .nest("/projects", project::router())
        .nest("/team-members", team_member::router())
        .nest("/recent", recent::router())
}
