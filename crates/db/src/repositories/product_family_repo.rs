//! Repository for the `product_families` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::product_family::{CreateProductFamily, ProductFamily, UpdateProductFamily};
use crate::models::{ListFilter, Page};

/// Column list for family queries, joined with parent (`p`) and zone (`z`).
const COLUMNS: &str = "\
    f.id, f.code, f.name, f.description, f.parent_id, p.name AS parent_name, \
    f.preparation_zone_id, z.name AS preparation_zone_name, f.color, f.sort_order, \
    f.is_active, f.created_at, f.updated_at";

const FROM: &str = "\
    product_families f \
    LEFT JOIN product_families p ON p.id = f.parent_id AND p.deleted_at IS NULL \
    LEFT JOIN preparation_zones z ON z.id = f.preparation_zone_id AND z.deleted_at IS NULL";

/// List filter: `?1` tenant, `?2` search, `?3` active, `?4` parent, `?5` zone.
const LIST_FILTER: &str = "\
    f.tenant_id = ?1 AND f.deleted_at IS NULL \
    AND (?2 IS NULL OR f.name LIKE ?2 ESCAPE '\\' OR f.code LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR f.is_active = ?3) \
    AND (?4 IS NULL OR f.parent_id = ?4) \
    AND (?5 IS NULL OR f.preparation_zone_id = ?5)";

/// Extra list filters specific to families.
#[derive(Debug, Clone, Default)]
pub struct FamilyFilter {
    pub parent_id: Option<DbId>,
    pub preparation_zone_id: Option<DbId>,
}

/// Provides CRUD operations for product families.
pub struct ProductFamilyRepo;

impl ProductFamilyRepo {
    /// List live families ordered by `sort_order`, then name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        family: &FamilyFilter,
        page: &PageRequest,
    ) -> Result<Page<ProductFamily>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM {FROM} WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(family.parent_id)
            .bind(family.preparation_zone_id)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE {LIST_FILTER} \
             ORDER BY f.sort_order, f.name LIMIT ?6 OFFSET ?7"
        );
        let items = sqlx::query_as::<_, ProductFamily>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(family.parent_id)
            .bind(family.preparation_zone_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live family by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<ProductFamily>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE f.id = ?1 AND f.tenant_id = ?2 AND f.deleted_at IS NULL"
        );
        sqlx::query_as::<_, ProductFamily>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Ids on the path from `id` up to its root, `id` included.
    ///
    /// Empty when `id` is not a live family of the tenant.
    pub async fn ancestor_ids(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "WITH RECURSIVE chain(id, parent_id) AS ( \
                 SELECT id, parent_id FROM product_families \
                  WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
                 UNION \
                 SELECT f.id, f.parent_id FROM product_families f \
                   JOIN chain c ON f.id = c.parent_id \
                  WHERE f.tenant_id = ?2 AND f.deleted_at IS NULL \
             ) \
             SELECT id FROM chain",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a new family.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateProductFamily,
    ) -> Result<ProductFamily, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO product_families \
                 (tenant_id, code, name, description, parent_id, preparation_zone_id, \
                  color, sort_order, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 0), COALESCE(?9, 1), ?10, ?10) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(input.preparation_zone_id)
        .bind(&input.color)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a family. Only non-`None` fields are applied; a `parent_id`
    /// or `preparation_zone_id` of `0` clears the reference.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateProductFamily,
    ) -> Result<Option<ProductFamily>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE product_families SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 description = COALESCE(?5, description), \
                 parent_id = CASE WHEN ?6 IS NULL THEN parent_id \
                                  WHEN ?6 = 0 THEN NULL ELSE ?6 END, \
                 preparation_zone_id = CASE WHEN ?7 IS NULL THEN preparation_zone_id \
                                            WHEN ?7 = 0 THEN NULL ELSE ?7 END, \
                 color = COALESCE(?8, color), \
                 sort_order = COALESCE(?9, sort_order), \
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
        .bind(input.parent_id)
        .bind(input.preparation_zone_id)
        .bind(&input.color)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, tenant_id, id).await,
            None => Ok(None),
        }
    }

    /// Soft-delete a family; its children become roots.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE product_families SET deleted_at = ?3, updated_at = ?3 \
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
            "UPDATE product_families SET parent_id = NULL, updated_at = ?3 \
             WHERE parent_id = ?1 AND tenant_id = ?2",
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
