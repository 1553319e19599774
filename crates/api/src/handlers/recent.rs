//! Handlers for the read-only `/recent` activity feeds.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use taskboard_core::activity::{ActivityType, RECENT_FEED_TYPES};
use taskboard_core::listing::SortOrder;
use taskboard_db::repositories::activity_repo::{FeedQuery, DEFAULT_ORDER, ORDERING_FIELDS};
use taskboard_db::repositories::ActivityRepo;
use taskboard_db::DbPool;

use super::activity::{render_activities, ActivityResponse};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `/recent/work` and `/recent/views`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `/recent/search`.
#[derive(Debug, Default, Deserialize)]
pub struct RecentSearchParams {
    pub query: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn single_type_feed(
    pool: &DbPool,
    activity_type: ActivityType,
    params: &FeedParams,
) -> AppResult<Vec<ActivityResponse>> {
    let feed = FeedQuery {
        types: &[activity_type],
        search: params.search.as_deref(),
        order: SortOrder::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER),
        limit: params.limit,
        offset: params.offset,
    };
    let activities = ActivityRepo::feed(pool, &feed).await?;
    Ok(render_activities(pool, activities).await?)
}

/// GET /api/recent/work
pub async fn work(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let body = single_type_feed(&state.pool, ActivityType::WorkDone, &params).await?;
    Ok(Json(body))
}

/// GET /api/recent/views
pub async fn views(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let body = single_type_feed(&state.pool, ActivityType::View, &params).await?;
    Ok(Json(body))
}

/// GET /api/recent/search?query=
///
/// Work and view activities, newest first. A blank `query` returns the
/// unfiltered feed.
pub async fn search(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<RecentSearchParams>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let feed = FeedQuery {
        types: RECENT_FEED_TYPES,
        search: params.query.as_deref(),
        order: DEFAULT_ORDER,
        limit: params.limit,
        offset: params.offset,
    };
    let activities = ActivityRepo::feed(&state.pool, &feed).await?;
    Ok(Json(render_activities(&state.pool, activities).await?))
}
