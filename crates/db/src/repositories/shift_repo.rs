//! Repository for the `shifts` table.

use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::shift::Shift;
use crate::models::{ListFilter, Page};

/// Column list for `shifts` queries.
const COLUMNS: &str = "id, code, name, start_time, end_time, is_active, created_at, updated_at";

const LIST_FILTER: &str = "\
    tenant_id = ?1 AND deleted_at IS NULL \
    AND (?2 IS NULL OR name LIKE ?2 ESCAPE '\\' OR code LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR is_active = ?3)";

/// A shift with its times already parsed.
#[derive(Debug, Clone)]
pub struct ShiftInput {
    pub code: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

/// Provides CRUD operations for shifts.
pub struct ShiftRepo;

impl ShiftRepo {
    /// List live shifts ordered by start time.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<Shift>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM shifts WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM shifts WHERE {LIST_FILTER} \
             ORDER BY start_time, name LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, Shift>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// All live, active shifts of a tenant.
    pub async fn list_active(pool: &SqlitePool, tenant_id: DbId) -> Result<Vec<Shift>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shifts \
             WHERE tenant_id = ?1 AND deleted_at IS NULL AND is_active = 1 \
             ORDER BY start_time, name"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Find a live shift by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shifts WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new shift.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &ShiftInput,
    ) -> Result<Shift, sqlx::Error> {
        let query = format!(
            "INSERT INTO shifts \
                 (tenant_id, code, name, start_time, end_time, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Overwrite a shift with fully merged values.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &ShiftInput,
    ) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!(
            "UPDATE shifts SET \
                 code = ?3, name = ?4, start_time = ?5, end_time = ?6, \
                 is_active = ?7, updated_at = ?8 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a shift.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE shifts SET deleted_at = ?3, updated_at = ?3 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
