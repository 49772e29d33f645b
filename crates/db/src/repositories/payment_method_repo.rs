//! Repository for the `payment_methods` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::payment_method::{CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod};
use crate::models::{ListFilter, Page};

/// Column list for `payment_methods` queries.
const COLUMNS: &str = "\
    id, code, name, kind, installments, first_due_days, days_between, \
    surcharge_percent, is_active, created_at, updated_at";

const LIST_FILTER: &str = "\
    tenant_id = ?1 AND deleted_at IS NULL \
    AND (?2 IS NULL OR name LIKE ?2 ESCAPE '\\' OR code LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR is_active = ?3)";

/// Provides CRUD operations for payment methods.
pub struct PaymentMethodRepo;

impl PaymentMethodRepo {
    /// List live methods ordered by name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<PaymentMethod>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM payment_methods WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM payment_methods WHERE {LIST_FILTER} \
             ORDER BY name, id LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live method by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<PaymentMethod>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_methods \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new method.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreatePaymentMethod,
    ) -> Result<PaymentMethod, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_methods \
                 (tenant_id, code, name, kind, installments, first_due_days, days_between, \
                  surcharge_percent, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, COALESCE(?5, 1), COALESCE(?6, 0), COALESCE(?7, 0), \
                     COALESCE(?8, 0), COALESCE(?9, 1), ?10, ?10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.installments)
            .bind(input.first_due_days)
            .bind(input.days_between)
            .bind(input.surcharge_percent)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Update a method. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdatePaymentMethod,
    ) -> Result<Option<PaymentMethod>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_methods SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 kind = COALESCE(?5, kind), \
                 installments = COALESCE(?6, installments), \
                 first_due_days = COALESCE(?7, first_due_days), \
                 days_between = COALESCE(?8, days_between), \
                 surcharge_percent = COALESCE(?9, surcharge_percent), \
                 is_active = COALESCE(?10, is_active), \
                 updated_at = ?11 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.installments)
            .bind(input.first_due_days)
            .bind(input.days_between)
            .bind(input.surcharge_percent)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Whether a live supplier or any invoice still points at the method.
    pub async fn is_referenced(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM suppliers \
                            WHERE payment_method_id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL) \
                 OR EXISTS(SELECT 1 FROM invoices \
                            WHERE payment_method_id = ?1 AND tenant_id = ?2)",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a method.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payment_methods SET deleted_at = ?3, updated_at = ?3 \
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
