//! Repository for the `grid_preferences` table.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use gestora_core::grid::GridColumn;
use gestora_core::types::DbId;

use crate::models::grid_preference::GridPreference;

/// Column list for `grid_preferences` queries.
const COLUMNS: &str = "id, grid_key, columns, created_at, updated_at";

/// Provides data access for per-user grid layouts.
pub struct GridPreferenceRepo;

impl GridPreferenceRepo {
    /// Get a user's layout for one grid.
    pub async fn find(
        pool: &SqlitePool,
        tenant_id: DbId,
        user_id: DbId,
        grid_key: &str,
    ) -> Result<Option<GridPreference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM grid_preferences \
             WHERE tenant_id = ?1 AND user_id = ?2 AND grid_key = ?3"
        );
        sqlx::query_as::<_, GridPreference>(&query)
            .bind(tenant_id)
            .bind(user_id)
            .bind(grid_key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a user's layout for one grid.
    pub async fn upsert(
        pool: &SqlitePool,
        tenant_id: DbId,
        user_id: DbId,
        grid_key: &str,
        columns: &[GridColumn],
    ) -> Result<GridPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO grid_preferences (tenant_id, user_id, grid_key, columns, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             ON CONFLICT (user_id, grid_key) DO UPDATE SET \
                 columns = excluded.columns, \
                 updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GridPreference>(&query)
            .bind(tenant_id)
            .bind(user_id)
            .bind(grid_key)
            .bind(Json(columns))
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Remove a user's layout, restoring the default grid.
    pub async fn delete(
        pool: &SqlitePool,
        tenant_id: DbId,
        user_id: DbId,
        grid_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM grid_preferences WHERE tenant_id = ?1 AND user_id = ?2 AND grid_key = ?3",
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(grid_key)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
