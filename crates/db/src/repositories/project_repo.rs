//! Repository for the `projects` table.

use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taskboard_core::listing::{like_pattern, normalize_search, SortOrder};
use taskboard_core::project::ProjectStatus;
use taskboard_core::types::DbId;

use super::{push_order_and_page, push_search};
use crate::models::project::{CreateProject, Project, ProjectListParams, UpdateProject};
use crate::NOW_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, priority, category, start_date, due_date, \
                       starred, team, created_at, updated_at";

/// Columns clients may order project lists by.
pub const ORDERING_FIELDS: &[&str] = &["created_at", "updated_at", "due_date", "start_date"];

/// Default project list order: newest first.
pub const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

/// Columns matched by the `search` parameter.
const SEARCH_COLUMNS: &[&str] = &["name", "description", "category", "priority"];

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// Omitted fields take the schema defaults (`Active`, `Medium`, not
    /// starred, empty team).
    pub async fn create(pool: &SqlitePool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, description, status, priority, category, start_date, due_date, starred, team)
             VALUES (?, COALESCE(?, ''), COALESCE(?, 'Active'), COALESCE(?, 'Medium'),
                     COALESCE(?, ''), ?, ?, COALESCE(?, 0), COALESCE(?, '[]'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(&input.category)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.starred)
            .bind(input.team.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filters, search term and ordering.
    pub async fn list(
        pool: &SqlitePool,
        params: &ProjectListParams,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM projects WHERE 1 = 1"));

        if let Some(starred) = params.starred {
            qb.push(" AND starred = ").push_bind(starred);
        }
        if let Some(status) = params.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(priority) = params.priority {
            qb.push(" AND priority = ").push_bind(priority.as_str());
        }
        if let Some(term) = normalize_search(params.search.as_deref()) {
            qb.push(" AND ");
            push_search(&mut qb, SEARCH_COLUMNS, &like_pattern(&term));
        }

        let order = SortOrder::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER);
        push_order_and_page(&mut qb, "", order, params.limit, params.offset);

        qb.build_query_as::<Project>().fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                priority = COALESCE(?, priority),
                category = COALESCE(?, category),
                start_date = CASE WHEN ? THEN ? ELSE start_date END,
                due_date = CASE WHEN ? THEN ? ELSE due_date END,
                starred = COALESCE(?, starred),
                team = COALESCE(?, team),
                updated_at = {NOW_SQL}
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(&input.category)
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.starred)
            .bind(input.team.as_ref().map(Json))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write only the `status` column.
    ///
    /// Used for follow-up corrections after a project write. Returns the
    /// updated row, or `None` if the project no longer exists.
    pub async fn set_status(
        pool: &SqlitePool,
        id: DbId,
        status: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = ?, updated_at = {NOW_SQL}
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project. Tasks and team members referencing it
    /// are detached by the schema (`ON DELETE SET NULL`).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
