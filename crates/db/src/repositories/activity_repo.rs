//! Repository for the `activities` table, including the recent-activity feeds.

use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taskboard_core::activity::ActivityType;
use taskboard_core::listing::{like_pattern, normalize_search, SortOrder};
use taskboard_core::types::DbId;

use super::{push_order_and_page, push_search};
use crate::models::activity::{Activity, ActivityListParams, CreateActivity, UpdateActivity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, task_id, activity_type, message, meta, created_at";

/// Same columns qualified with the `a` alias for joined queries.
const A_COLUMNS: &str =
    "a.id, a.user_id, a.task_id, a.activity_type, a.message, a.meta, a.created_at";

/// Joins needed to search by username and task title.
const JOINS: &str = "FROM activities a \
                     JOIN users u ON u.id = a.user_id \
                     LEFT JOIN tasks t ON t.id = a.task_id";

/// Columns clients may order activity lists by.
pub const ORDERING_FIELDS: &[&str] = &["created_at"];

/// Default activity order: newest first.
pub const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

/// Columns matched by search terms.
const SEARCH_COLUMNS: &[&str] = &["a.message", "u.username", "t.title"];

/// Filter for the recent-activity feeds.
#[derive(Debug, Clone)]
pub struct FeedQuery<'a> {
    /// Activity types included in the feed.
    pub types: &'a [ActivityType],
    pub search: Option<&'a str>,
    pub order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Provides CRUD operations for activities.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Record an activity performed by `user_id`, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        user_id: DbId,
        input: &CreateActivity,
    ) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities (user_id, task_id, activity_type, message, meta)
             VALUES (?, ?, ?, ?, COALESCE(?, '{{}}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(user_id)
            .bind(input.task_id)
            .bind(input.activity_type.as_str())
            .bind(&input.message)
            .bind(input.meta.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find an activity by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = ?");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List activities matching the type filter, search term and ordering.
    pub async fn list(
        pool: &SqlitePool,
        params: &ActivityListParams,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {A_COLUMNS} {JOINS} WHERE 1 = 1"));

        if let Some(activity_type) = params.activity_type {
            qb.push(" AND a.activity_type = ")
                .push_bind(activity_type.as_str());
        }
        if let Some(term) = normalize_search(params.search.as_deref()) {
            qb.push(" AND ");
            push_search(&mut qb, SEARCH_COLUMNS, &like_pattern(&term));
        }

        let order = SortOrder::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER);
        push_order_and_page(&mut qb, "a.", order, params.limit, params.offset);

        qb.build_query_as::<Activity>().fetch_all(pool).await
    }

    /// Activities of the given types, optionally narrowed by a search term.
    ///
    /// Backs `/recent/work`, `/recent/views` and `/recent/search`.
    pub async fn feed(pool: &SqlitePool, feed: &FeedQuery<'_>) -> Result<Vec<Activity>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {A_COLUMNS} {JOINS} WHERE a.activity_type IN ("));
        let mut separated = qb.separated(", ");
        for activity_type in feed.types {
            separated.push_bind(activity_type.as_str());
        }
        separated.push_unseparated(")");

        if let Some(term) = normalize_search(feed.search) {
            qb.push(" AND ");
            push_search(&mut qb, SEARCH_COLUMNS, &like_pattern(&term));
        }

        push_order_and_page(&mut qb, "a.", feed.order, feed.limit, feed.offset);

        qb.build_query_as::<Activity>().fetch_all(pool).await
    }

    /// Update an activity. Only fields present in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateActivity,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!(
            "UPDATE activities SET
                activity_type = COALESCE(?, activity_type),
                message = COALESCE(?, message),
                user_id = COALESCE(?, user_id),
                task_id = CASE WHEN ? THEN ? ELSE task_id END,
                meta = COALESCE(?, meta)
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(input.activity_type.map(|t| t.as_str()))
            .bind(&input.message)
            .bind(input.user_id)
            .bind(input.task_id.is_some())
            .bind(input.task_id.flatten())
            .bind(input.meta.as_ref().map(Json))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an activity. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
