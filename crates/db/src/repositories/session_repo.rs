//! Repository for the `sessions` table.

use sqlx::SqlitePool;
use taskboard_core::types::DbId;

use crate::models::session::{CreateSession, Session};
use crate::NOW_SQL;

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at";

/// Refresh-token session storage.
pub struct SessionRepo;

impl SessionRepo {
    /// Open a new session.
    pub async fn create(pool: &SqlitePool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at)
             VALUES (?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an unrevoked, unexpired session by refresh-token hash.
    pub async fn find_active_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE refresh_token_hash = ? AND revoked_at IS NULL AND expires_at > ?"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token_hash)
            .bind(chrono::Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session.
    pub async fn revoke(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET revoked_at = {NOW_SQL} WHERE id = ? AND revoked_at IS NULL"
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every open session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &SqlitePool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET revoked_at = {NOW_SQL} WHERE user_id = ? AND revoked_at IS NULL"
        );
        let result = sqlx::query(&query).bind(user_id).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
