//! Repository for the `team_members` table.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taskboard_core::listing::SortOrder;
use taskboard_core::types::DbId;

use super::push_order_and_page;
use crate::models::team_member::{
    CreateTeamMember, TeamMember, TeamMemberListParams, UpdateTeamMember,
};
use crate::NOW_SQL;

/// Member columns plus the joined project name.
const SELECT: &str = "SELECT m.id, m.name, m.email, m.role, m.department, m.project_id, \
                      p.name AS project_name, m.status, m.total_tasks, m.completed_tasks, \
                      m.created_at, m.updated_at \
                      FROM team_members m \
                      LEFT JOIN projects p ON p.id = m.project_id";

/// Team members are listed alphabetically.
const DEFAULT_ORDER: SortOrder = SortOrder::asc("name");

/// Provides CRUD operations for team members.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    /// Insert a new team member, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateTeamMember,
    ) -> Result<TeamMember, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO team_members
                (name, email, role, department, project_id, status, total_tasks, completed_tasks)
             VALUES (?, ?, COALESCE(?, 'Employee'), COALESCE(?, ''), ?, COALESCE(?, 'Active'),
                     COALESCE(?, 0), COALESCE(?, 0))
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.role.map(|r| r.as_str()))
        .bind(&input.department)
        .bind(input.project_id)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.total_tasks)
        .bind(input.completed_tasks)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a team member by internal ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!("{SELECT} WHERE m.id = ?");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List team members matching the filters, ordered by name.
    pub async fn list(
        pool: &SqlitePool,
        params: &TeamMemberListParams,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{SELECT} WHERE 1 = 1"));

        if let Some(role) = params.role {
            qb.push(" AND m.role = ").push_bind(role.as_str());
        }
        if let Some(department) = &params.department {
            qb.push(" AND m.department = ").push_bind(department.clone());
        }
        if let Some(status) = params.status {
            qb.push(" AND m.status = ").push_bind(status.as_str());
        }
        if let Some(project) = params.project {
            qb.push(" AND m.project_id = ").push_bind(project);
        }

        push_order_and_page(&mut qb, "m.", DEFAULT_ORDER, params.limit, params.offset);

        qb.build_query_as::<TeamMember>().fetch_all(pool).await
    }

    /// Update a team member. Only fields present in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                role = COALESCE(?, role),
                department = COALESCE(?, department),
                project_id = CASE WHEN ? THEN ? ELSE project_id END,
                status = COALESCE(?, status),
                total_tasks = COALESCE(?, total_tasks),
                completed_tasks = COALESCE(?, completed_tasks),
                updated_at = {NOW_SQL}
             WHERE id = ?"
        );
        let result = sqlx::query(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.map(|r| r.as_str()))
            .bind(&input.department)
            .bind(input.project_id.is_some())
            .bind(input.project_id.flatten())
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.total_tasks)
            .bind(input.completed_tasks)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a team member. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
