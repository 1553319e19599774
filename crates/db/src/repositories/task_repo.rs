//! Repository for the `tasks` table.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taskboard_core::listing::{like_pattern, normalize_search, SortOrder};
use taskboard_core::progress::TaskWeight;
use taskboard_core::types::DbId;

use super::{push_order_and_page, push_search};
use crate::models::task::{CreateTask, ProjectTaskWeight, Task, TaskListParams, UpdateTask};
use crate::NOW_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status, assignee_id, project_id, priority, \
                       story_points, start_date, due_date, created_at, updated_at";

/// Same columns qualified with the `t` alias for joined queries.
const T_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.assignee_id, t.project_id, \
                         t.priority, t.story_points, t.start_date, t.due_date, t.created_at, \
                         t.updated_at";

/// Columns clients may order task lists by.
pub const ORDERING_FIELDS: &[&str] = &["created_at", "updated_at", "due_date", "start_date"];

/// Default task list order: newest first.
pub const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

/// Columns matched by the `search` parameter.
const SEARCH_COLUMNS: &[&str] = &["t.title", "t.description", "u.username"];

/// Provides CRUD operations for tasks and the progress inputs of projects.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, status, assignee_id, project_id, priority, story_points,
                 start_date, due_date)
             VALUES (?, COALESCE(?, ''), COALESCE(?, 'todo'), ?, ?, COALESCE(?, 'medium'),
                     COALESCE(?, 0), ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.assignee_id)
            .bind(input.project_id)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.story_points)
            .bind(input.start_date)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = ?");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a set of tasks by ID. Unknown IDs are skipped.
    pub async fn find_by_ids(pool: &SqlitePool, ids: &[DbId]) -> Result<Vec<Task>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM tasks WHERE id IN ("));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        qb.build_query_as::<Task>().fetch_all(pool).await
    }

    /// List tasks matching the filters, search term and ordering.
    pub async fn list(pool: &SqlitePool, params: &TaskListParams) -> Result<Vec<Task>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {T_COLUMNS} FROM tasks t \
             LEFT JOIN users u ON u.id = t.assignee_id \
             WHERE 1 = 1"
        ));

        if let Some(status) = params.status {
            qb.push(" AND t.status = ").push_bind(status.as_str());
        }
        if let Some(assignee) = params.assignee {
            qb.push(" AND t.assignee_id = ").push_bind(assignee);
        }
        if let Some(project) = params.project {
            qb.push(" AND t.project_id = ").push_bind(project);
        }
        if let Some(term) = normalize_search(params.search.as_deref()) {
            qb.push(" AND ");
            push_search(&mut qb, SEARCH_COLUMNS, &like_pattern(&term));
        }

        let order = SortOrder::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER);
        push_order_and_page(&mut qb, "t.", order, params.limit, params.offset);

        qb.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Update a task. Only fields present in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                assignee_id = CASE WHEN ? THEN ? ELSE assignee_id END,
                project_id = CASE WHEN ? THEN ? ELSE project_id END,
                priority = COALESCE(?, priority),
                story_points = COALESCE(?, story_points),
                start_date = CASE WHEN ? THEN ? ELSE start_date END,
                due_date = CASE WHEN ? THEN ? ELSE due_date END,
                updated_at = {NOW_SQL}
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.assignee_id.is_some())
            .bind(input.assignee_id.flatten())
            .bind(input.project_id.is_some())
            .bind(input.project_id.flatten())
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.story_points)
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Progress inputs
    // -----------------------------------------------------------------------

    /// Status and story points of every task currently in a project.
    pub async fn weights_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<TaskWeight>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectTaskWeight>(
            "SELECT project_id, status, story_points FROM tasks WHERE project_id = ?",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(ProjectTaskWeight::weight).collect())
    }

    /// Task weights for several projects at once, grouped by project.
    ///
    /// Projects without tasks are absent from the returned map.
    pub async fn weights_for_projects(
        pool: &SqlitePool,
        project_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<TaskWeight>>, sqlx::Error> {
        let mut grouped: HashMap<DbId, Vec<TaskWeight>> = HashMap::new();
        if project_ids.is_empty() {
            return Ok(grouped);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT project_id, status, story_points FROM tasks WHERE project_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in project_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<ProjectTaskWeight>()
            .fetch_all(pool)
            .await?;
        for row in &rows {
            grouped.entry(row.project_id).or_default().push(row.weight());
        }
        Ok(grouped)
    }
}
