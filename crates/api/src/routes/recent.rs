//! Route definitions for the read-only `/recent` feeds.

use axum::routing::get;
use axum::Router;

use crate::handlers::recent;
use crate::state::AppState;

/// Routes mounted at `/recent`.
///
/// ```text
/// GET /work    -> work
/// GET /views   -> views
/// GET /search  -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/work", get(recent::work))
        .route("/views", get(recent::views))
        .route("/search", get(recent::search))
}
