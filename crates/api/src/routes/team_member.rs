//! Route definitions for the `/team-members` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::team_member;
use crate::state::AppState;

/// Routes mounted at `/team-members`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// PATCH  /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(team_member::list).post(team_member::create))
        .route(
            "/{id}",
            get(team_member::get_by_id)
                .put(team_member::update)
                .patch(team_member::update)
                .delete(team_member::delete),
        )
}
