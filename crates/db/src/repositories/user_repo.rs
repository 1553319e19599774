//! Repository for the `users` table.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taskboard_core::types::DbId;

use crate::models::user::{CreateUser, User, UserSummary};
use crate::NOW_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, is_active, \
                       last_login_at, created_at, updated_at";

/// Columns of the public [`UserSummary`] projection.
const SUMMARY_COLUMNS: &str = "id, username, first_name, last_name, email";

/// Provides read and account operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, first_name, last_name, email, password_hash)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find the public summary of a user by ID.
    pub async fn find_summary(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<UserSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, UserSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load public summaries for a set of user IDs. Unknown IDs are skipped.
    pub async fn find_summaries(
        pool: &SqlitePool,
        ids: &[DbId],
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} FROM users WHERE id IN ("));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        qb.build_query_as::<UserSummary>().fetch_all(pool).await
    }

    /// List public user summaries ordered by ID.
    pub async fn list_summaries(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query =
            format!("SELECT {SUMMARY_COLUMNS} FROM users ORDER BY id ASC LIMIT ? OFFSET ?");
        sqlx::query_as::<_, UserSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all users.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_active = 0, updated_at = {NOW_SQL} WHERE id = ? AND is_active = 1"
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp a successful login.
    pub async fn record_successful_login(pool: &SqlitePool, id: DbId) -> Result<(), sqlx::Error> {
        let query = format!("UPDATE users SET last_login_at = {NOW_SQL} WHERE id = ?");
        sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(())
    }
}
