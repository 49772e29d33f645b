//! Repository for the `work_orders` table and its lines.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use gestora_core::document_lines::{ComputedLine, DocumentTotals};
use gestora_core::pagination::PageRequest;
use gestora_core::types::{Date, DbId};
use gestora_core::work_order::{self, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_INVOICED};

use crate::models::invoice::CreateInvoice;
use crate::models::work_order::{CreateWorkOrder, UpdateWorkOrder, WorkOrder, WorkOrderFilter};
use crate::models::Page;
use crate::repositories::{DocumentLineRepo, InvoiceRepo, LineTable};

/// Column list for `work_orders` queries.
const COLUMNS: &str = "\
    id, number, customer_name, description, status, scheduled_date, due_date, \
    completed_date, sales_agent_id, technician, subtotal, tax_total, total, \
    created_at, updated_at";

/// List filter: `?1` tenant, `?2` status, `?3`/`?4` scheduled range, `?5` search.
const LIST_FILTER: &str = "\
    tenant_id = ?1 \
    AND (?2 IS NULL OR status = ?2) \
    AND (?3 IS NULL OR scheduled_date >= ?3) \
    AND (?4 IS NULL OR scheduled_date <= ?4) \
    AND (?5 IS NULL OR number LIKE ?5 ESCAPE '\\' OR customer_name LIKE ?5 ESCAPE '\\' \
         OR description LIKE ?5 ESCAPE '\\' OR technician LIKE ?5 ESCAPE '\\')";

/// Provides data access for work orders.
pub struct WorkOrderRepo;

impl WorkOrderRepo {
    /// List work orders, newest first.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &WorkOrderFilter,
        page: &PageRequest,
    ) -> Result<Page<WorkOrder>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM work_orders WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM work_orders WHERE {LIST_FILTER} \
             ORDER BY sequence DESC LIMIT ?6 OFFSET ?7"
        );
        let items = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a work order by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_orders WHERE id = ?1 AND tenant_id = ?2");
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    async fn store_totals(
        conn: &mut SqliteConnection,
        id: DbId,
        totals: &DocumentTotals,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE work_orders SET subtotal = ?2, tax_total = ?3, total = ?4, updated_at = ?5 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(totals.subtotal)
        .bind(totals.tax_total)
        .bind(totals.total)
        .bind(Utc::now())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert a work order with its lines, assigning the next number of
    /// the tenant.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateWorkOrder,
        lines: &[ComputedLine],
        totals: &DocumentTotals,
    ) -> Result<WorkOrder, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence), 0) + 1 FROM work_orders WHERE tenant_id = ?1",
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO work_orders \
                 (tenant_id, number, sequence, customer_name, description, status, \
                  scheduled_date, due_date, sales_agent_id, technician, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?8, ?9, ?10, ?10) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(work_order::format_number(sequence))
        .bind(sequence)
        .bind(&input.customer_name)
        .bind(&input.description)
        .bind(input.scheduled_date)
        .bind(input.due_date)
        .bind(input.sales_agent_id)
        .bind(&input.technician)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        DocumentLineRepo::replace(&mut tx, LineTable::WorkOrder, id, lines).await?;
        Self::store_totals(&mut tx, id, totals).await?;
        tx.commit().await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update the header of a work order. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateWorkOrder,
    ) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE work_orders SET \
                 customer_name = COALESCE(?3, customer_name), \
                 description = COALESCE(?4, description), \
                 scheduled_date = COALESCE(?5, scheduled_date), \
                 due_date = COALESCE(?6, due_date), \
                 sales_agent_id = COALESCE(?7, sales_agent_id), \
                 technician = COALESCE(?8, technician), \
                 updated_at = ?9 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.customer_name)
            .bind(&input.description)
            .bind(input.scheduled_date)
            .bind(input.due_date)
            .bind(input.sales_agent_id)
            .bind(&input.technician)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Replace all lines of a work order and store the new totals.
    pub async fn replace_lines(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        lines: &[ComputedLine],
        totals: &DocumentTotals,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM work_orders WHERE id = ?1 AND tenant_id = ?2)",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;
        if !owned {
            return Ok(false);
        }

        DocumentLineRepo::replace(&mut tx, LineTable::WorkOrder, id, lines).await?;
        Self::store_totals(&mut tx, id, totals).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Set the status. `completed_date` is stored when moving to completed
    /// and cleared when moving back.
    pub async fn set_status(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        status: &str,
        completed_date: Option<Date>,
    ) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE work_orders SET \
                 status = ?3, \
                 completed_date = CASE WHEN ?3 = ?4 THEN ?5 \
                                       WHEN ?3 IN (?6, ?7) THEN completed_date \
                                       ELSE NULL END, \
                 updated_at = ?8 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(status)
            .bind(STATUS_COMPLETED)
            .bind(completed_date)
            .bind(STATUS_INVOICED)
            .bind(STATUS_CANCELLED)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a work order (its lines cascade).
    pub async fn delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = ?1 AND tenant_id = ?2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create a draft invoice from a completed order and mark the order
    /// invoiced, atomically.
    ///
    /// Returns `None` when the order is no longer `completed`.
    pub async fn convert_to_invoice(
        pool: &SqlitePool,
        tenant_id: DbId,
        order_id: DbId,
        header: &CreateInvoice,
        series: &str,
        lines: &[ComputedLine],
        totals: &DocumentTotals,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE work_orders SET status = ?3, updated_at = ?4 \
             WHERE id = ?1 AND tenant_id = ?2 AND status = ?5",
        )
        .bind(order_id)
        .bind(tenant_id)
        .bind(STATUS_INVOICED)
        .bind(Utc::now())
        .bind(STATUS_COMPLETED)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let invoice_id = InvoiceRepo::insert_draft(&mut tx, tenant_id, header, series, totals).await?;
        DocumentLineRepo::replace(&mut tx, LineTable::Invoice, invoice_id, lines).await?;
        tx.commit().await?;
        Ok(Some(invoice_id))
    }

    // -----------------------------------------------------------------------
    // Planning
    // -----------------------------------------------------------------------

    /// Live (not cancelled) orders scheduled within `[from, to]`.
    pub async fn scheduled_between(
        pool: &SqlitePool,
        tenant_id: DbId,
        from: Date,
        to: Date,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders \
             WHERE tenant_id = ?1 AND status <> ?4 \
               AND scheduled_date >= ?2 AND scheduled_date <= ?3 \
             ORDER BY number"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(tenant_id)
            .bind(from)
            .bind(to)
            .bind(STATUS_CANCELLED)
            .fetch_all(pool)
            .await
    }

    /// Live (not cancelled) orders due within `[from, to]`.
    pub async fn due_between(
        pool: &SqlitePool,
        tenant_id: DbId,
        from: Date,
        to: Date,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders \
             WHERE tenant_id = ?1 AND status <> ?4 \
               AND due_date >= ?2 AND due_date <= ?3 \
             ORDER BY number"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(tenant_id)
            .bind(from)
            .bind(to)
            .bind(STATUS_CANCELLED)
            .fetch_all(pool)
            .await
    }
}
