//! Repository for the `sessions` table (refresh tokens).

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::types::DbId;

use crate::models::session::{CreateSession, Session};

/// Column list for `sessions` queries.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at";

/// Provides data access for refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session.
    pub async fn create(pool: &SqlitePool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a non-revoked, non-expired session by refresh token hash.
    pub async fn find_active_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE refresh_token_hash = ?1 AND is_revoked = 0 AND expires_at > ?2"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token_hash)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Revoke one session.
    pub async fn revoke(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET is_revoked = 1 WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every active session of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(pool: &SqlitePool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET is_revoked = 1 WHERE user_id = ?1 AND is_revoked = 0")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
