//! Repository for the `stock_movements` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::stock::{KIND_OUT, KIND_TRANSFER};
use gestora_core::types::DbId;

use crate::models::stock_movement::{
    CreateStockMovement, StockLevel, StockMovement, StockMovementFilter,
};
use crate::models::Page;

/// Column list for `stock_movements` queries.
const COLUMNS: &str = "\
    id, product_code, product_name, warehouse, destination_warehouse, kind, quantity, \
    unit_cost, movement_date, reference, notes, created_at, updated_at";

/// Filter: `?1` tenant, `?2` product, `?3` warehouse (source or
/// destination), `?4` kind, `?5`/`?6` date range, `?7` search.
const LIST_FILTER: &str = "\
    tenant_id = ?1 \
    AND (?2 IS NULL OR product_code = ?2) \
    AND (?3 IS NULL OR warehouse = ?3 OR destination_warehouse = ?3) \
    AND (?4 IS NULL OR kind = ?4) \
    AND (?5 IS NULL OR movement_date >= ?5) \
    AND (?6 IS NULL OR movement_date <= ?6) \
    AND (?7 IS NULL OR product_code LIKE ?7 ESCAPE '\\' OR product_name LIKE ?7 ESCAPE '\\' \
         OR reference LIKE ?7 ESCAPE '\\')";

/// Provides data access for stock movements.
pub struct StockMovementRepo;

impl StockMovementRepo {
    /// List movements, most recent first.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &StockMovementFilter,
        page: &PageRequest,
    ) -> Result<Page<StockMovement>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM stock_movements WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.product_code)
            .bind(&filter.warehouse)
            .bind(&filter.kind)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM stock_movements WHERE {LIST_FILTER} \
             ORDER BY movement_date DESC, id DESC LIMIT ?8 OFFSET ?9"
        );
        let items = sqlx::query_as::<_, StockMovement>(&query)
            .bind(tenant_id)
            .bind(&filter.product_code)
            .bind(&filter.warehouse)
            .bind(&filter.kind)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a movement by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<StockMovement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stock_movements WHERE id = ?1 AND tenant_id = ?2");
        sqlx::query_as::<_, StockMovement>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new movement.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateStockMovement,
    ) -> Result<StockMovement, sqlx::Error> {
        let query = format!(
            "INSERT INTO stock_movements \
                 (tenant_id, product_code, product_name, warehouse, destination_warehouse, kind, \
                  quantity, unit_cost, movement_date, reference, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StockMovement>(&query)
            .bind(tenant_id)
            .bind(&input.product_code)
            .bind(&input.product_name)
            .bind(&input.warehouse)
            .bind(&input.destination_warehouse)
            .bind(&input.kind)
            .bind(input.quantity)
            .bind(input.unit_cost)
            .bind(input.movement_date)
            .bind(&input.reference)
            .bind(&input.notes)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Overwrite a movement with fully merged values.
    ///
    /// The whole row is replaced so that kind, quantity and destination are
    /// always validated together.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &CreateStockMovement,
    ) -> Result<Option<StockMovement>, sqlx::Error> {
        let query = format!(
            "UPDATE stock_movements SET \
                 product_code = ?3, product_name = ?4, warehouse = ?5, \
                 destination_warehouse = ?6, kind = ?7, quantity = ?8, unit_cost = ?9, \
                 movement_date = ?10, reference = ?11, notes = ?12, updated_at = ?13 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StockMovement>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.product_code)
            .bind(&input.product_name)
            .bind(&input.warehouse)
            .bind(&input.destination_warehouse)
            .bind(&input.kind)
            .bind(input.quantity)
            .bind(input.unit_cost)
            .bind(input.movement_date)
            .bind(&input.reference)
            .bind(&input.notes)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a movement.
    pub async fn delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stock_movements WHERE id = ?1 AND tenant_id = ?2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// On-hand quantity per (product, warehouse).
    ///
    /// `out` and the source side of a `transfer` subtract; `in`,
    /// `adjustment` (signed) and the destination side of a transfer add.
    pub async fn levels(
        pool: &SqlitePool,
        tenant_id: DbId,
        warehouse: Option<&str>,
        product_code: Option<&str>,
    ) -> Result<Vec<StockLevel>, sqlx::Error> {
        sqlx::query_as::<_, StockLevel>(
            "SELECT product_code, warehouse, ROUND(SUM(delta), 4) AS quantity FROM ( \
                 SELECT product_code, warehouse, \
                        CASE WHEN kind IN (?4, ?5) THEN -quantity ELSE quantity END AS delta \
                   FROM stock_movements WHERE tenant_id = ?1 \
                 UNION ALL \
                 SELECT product_code, destination_warehouse AS warehouse, quantity AS delta \
                   FROM stock_movements WHERE tenant_id = ?1 AND kind = ?5 \
             ) \
             WHERE (?2 IS NULL OR warehouse = ?2) AND (?3 IS NULL OR product_code = ?3) \
             GROUP BY product_code, warehouse \
             ORDER BY product_code, warehouse",
        )
        .bind(tenant_id)
        .bind(warehouse)
        .bind(product_code)
        .bind(KIND_OUT)
        .bind(KIND_TRANSFER)
        .fetch_all(pool)
        .await
    }
}
