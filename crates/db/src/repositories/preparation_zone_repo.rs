//! Repository for the `preparation_zones` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::preparation_zone::{
    CreatePreparationZone, PreparationZone, UpdatePreparationZone,
};
use crate::models::{ListFilter, Page};

/// Column list for zone queries (aliased `z`), including the live family count.
const COLUMNS: &str = "\
    z.id, z.code, z.name, z.description, z.color, z.sort_order, z.kds_enabled, \
    z.printer_name, z.is_active, \
    (SELECT COUNT(*) FROM product_families f \
      WHERE f.preparation_zone_id = z.id AND f.deleted_at IS NULL) AS family_count, \
    z.created_at, z.updated_at";

/// List filter: `?1` tenant, `?2` search pattern, `?3` active flag.
const LIST_FILTER: &str = "\
    z.tenant_id = ?1 AND z.deleted_at IS NULL \
    AND (?2 IS NULL OR z.name LIKE ?2 ESCAPE '\\' OR z.code LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR z.is_active = ?3)";

/// Provides CRUD operations for preparation zones.
pub struct PreparationZoneRepo;

impl PreparationZoneRepo {
    /// List live zones ordered by `sort_order`, then name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<PreparationZone>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM preparation_zones z WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM preparation_zones z WHERE {LIST_FILTER} \
             ORDER BY z.sort_order, z.name LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, PreparationZone>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live zone by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<PreparationZone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM preparation_zones z \
             WHERE z.id = ?1 AND z.tenant_id = ?2 AND z.deleted_at IS NULL"
        );
        sqlx::query_as::<_, PreparationZone>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a live zone with this id exists in the tenant.
    pub async fn exists(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM preparation_zones \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL)",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a new zone.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreatePreparationZone,
    ) -> Result<PreparationZone, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO preparation_zones \
                 (tenant_id, code, name, description, color, sort_order, kds_enabled, \
                  printer_name, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 0), COALESCE(?7, 1), ?8, \
                     COALESCE(?9, 1), ?10, ?10) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .bind(input.sort_order)
        .bind(input.kds_enabled)
        .bind(&input.printer_name)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a zone. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdatePreparationZone,
    ) -> Result<Option<PreparationZone>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE preparation_zones SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 description = COALESCE(?5, description), \
                 color = COALESCE(?6, color), \
                 sort_order = COALESCE(?7, sort_order), \
                 kds_enabled = COALESCE(?8, kds_enabled), \
                 printer_name = COALESCE(?9, printer_name), \
                 is_active = COALESCE(?10, is_active), \
                 updated_at = ?11 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING id",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .bind(input.sort_order)
        .bind(input.kds_enabled)
        .bind(&input.printer_name)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, tenant_id, id).await,
            None => Ok(None),
        }
    }

    /// Soft-delete a zone and detach the families routed to it.
    ///
    /// Returns `true` if a live row was deleted.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE preparation_zones SET deleted_at = ?3, updated_at = ?3 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE product_families SET preparation_zone_id = NULL, updated_at = ?3 \
             WHERE preparation_zone_id = ?1 AND tenant_id = ?2",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
