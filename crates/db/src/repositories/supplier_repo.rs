//! Repository for the `suppliers` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use crate::models::{ListFilter, Page};

/// Column list for supplier queries, joined with the payment method (`m`).
const COLUMNS: &str = "\
    s.id, s.code, s.name, s.trade_name, s.tax_id, s.email, s.phone, s.address, \
    s.city, s.postal_code, s.province, s.country, s.payment_method_id, \
    m.name AS payment_method_name, s.notes, s.is_active, s.created_at, s.updated_at";

const FROM: &str = "\
    suppliers s \
    LEFT JOIN payment_methods m ON m.id = s.payment_method_id AND m.deleted_at IS NULL";

const LIST_FILTER: &str = "\
    s.tenant_id = ?1 AND s.deleted_at IS NULL \
    AND (?2 IS NULL OR s.name LIKE ?2 ESCAPE '\\' OR s.trade_name LIKE ?2 ESCAPE '\\' \
         OR s.code LIKE ?2 ESCAPE '\\' OR s.tax_id LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR s.is_active = ?3)";

/// Provides CRUD operations for suppliers.
pub struct SupplierRepo;

impl SupplierRepo {
    /// List live suppliers ordered by name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<Supplier>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM {FROM} WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE {LIST_FILTER} \
             ORDER BY s.name, s.id LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, Supplier>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live supplier by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE s.id = ?1 AND s.tenant_id = ?2 AND s.deleted_at IS NULL"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new supplier.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateSupplier,
    ) -> Result<Supplier, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO suppliers \
                 (tenant_id, code, name, trade_name, tax_id, email, phone, address, city, \
                  postal_code, province, country, payment_method_id, notes, is_active, \
                  created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
                     COALESCE(?15, 1), ?16, ?16) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.trade_name)
        .bind(&input.tax_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.province)
        .bind(&input.country)
        .bind(input.payment_method_id)
        .bind(&input.notes)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a supplier. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE suppliers SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 trade_name = COALESCE(?5, trade_name), \
                 tax_id = COALESCE(?6, tax_id), \
                 email = COALESCE(?7, email), \
                 phone = COALESCE(?8, phone), \
                 address = COALESCE(?9, address), \
                 city = COALESCE(?10, city), \
                 postal_code = COALESCE(?11, postal_code), \
                 province = COALESCE(?12, province), \
                 country = COALESCE(?13, country), \
                 payment_method_id = COALESCE(?14, payment_method_id), \
                 notes = COALESCE(?15, notes), \
                 is_active = COALESCE(?16, is_active), \
                 updated_at = ?17 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING id",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.trade_name)
        .bind(&input.tax_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.province)
        .bind(&input.country)
        .bind(input.payment_method_id)
        .bind(&input.notes)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, tenant_id, id).await,
            None => Ok(None),
        }
    }

    /// Soft-delete a supplier.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE suppliers SET deleted_at = ?3, updated_at = ?3 \
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
