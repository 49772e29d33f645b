//! Repository for the `invoices` table and its lines.
//!
//! Numbering happens on issue: the next number of the tenant's
//! series/year is taken inside the issuing transaction, and the partial
//! unique index on `(tenant_id, series, fiscal_year, number)` rejects any
//! concurrent duplicate.

use chrono::{Datelike, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use gestora_core::document_lines::{ComputedLine, DocumentTotals};
use gestora_core::invoice::{self, STATUS_CANCELLED, STATUS_DRAFT, STATUS_ISSUED, STATUS_PAID};
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::invoice::{CreateInvoice, Invoice, InvoiceFilter, UpdateInvoice};
use crate::models::Page;
use crate::repositories::{DocumentLineRepo, LineTable};

/// Column list for `invoices` queries.
const COLUMNS: &str = "\
    id, series, fiscal_year, number, code, issue_date, due_date, customer_name, \
    customer_tax_id, customer_address, payment_method_id, sales_agent_id, \
    work_order_id, status, notes, subtotal, tax_total, total, issued_at, \
    created_at, updated_at";

/// List filter: `?1` tenant, `?2` status, `?3` series, `?4`/`?5` issue
/// date range, `?6` search.
const LIST_FILTER: &str = "\
    tenant_id = ?1 \
    AND (?2 IS NULL OR status = ?2) \
    AND (?3 IS NULL OR series = ?3) \
    AND (?4 IS NULL OR issue_date >= ?4) \
    AND (?5 IS NULL OR issue_date <= ?5) \
    AND (?6 IS NULL OR code LIKE ?6 ESCAPE '\\' OR customer_name LIKE ?6 ESCAPE '\\' \
         OR customer_tax_id LIKE ?6 ESCAPE '\\')";

/// Provides data access for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// List invoices, latest issue date first.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> Result<Page<Invoice>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM invoices WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(&filter.series)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM invoices WHERE {LIST_FILTER} \
             ORDER BY issue_date DESC, id DESC LIMIT ?7 OFFSET ?8"
        );
        let items = sqlx::query_as::<_, Invoice>(&query)
            .bind(tenant_id)
            .bind(&filter.status)
            .bind(&filter.series)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find an invoice by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = ?1 AND tenant_id = ?2");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a draft header on the caller's connection.
    pub(crate) async fn insert_draft(
        conn: &mut SqliteConnection,
        tenant_id: DbId,
        input: &CreateInvoice,
        series: &str,
        totals: &DocumentTotals,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO invoices \
                 (tenant_id, series, issue_date, due_date, customer_name, customer_tax_id, \
                  customer_address, payment_method_id, sales_agent_id, work_order_id, status, \
                  notes, subtotal, tax_total, total, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(series)
        .bind(input.issue_date)
        .bind(input.due_date)
        .bind(&input.customer_name)
        .bind(&input.customer_tax_id)
        .bind(&input.customer_address)
        .bind(input.payment_method_id)
        .bind(input.sales_agent_id)
        .bind(input.work_order_id)
        .bind(STATUS_DRAFT)
        .bind(&input.notes)
        .bind(totals.subtotal)
        .bind(totals.tax_total)
        .bind(totals.total)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    /// Insert a draft invoice with its lines.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateInvoice,
        series: &str,
        lines: &[ComputedLine],
        totals: &DocumentTotals,
    ) -> Result<Invoice, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = Self::insert_draft(&mut tx, tenant_id, input, series, totals).await?;
        DocumentLineRepo::replace(&mut tx, LineTable::Invoice, id, lines).await?;
        tx.commit().await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a draft's header. Returns `None` when the invoice is missing
    /// or no longer a draft.
    pub async fn update_draft(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET \
                 series = COALESCE(?3, series), \
                 issue_date = COALESCE(?4, issue_date), \
                 due_date = COALESCE(?5, due_date), \
                 customer_name = COALESCE(?6, customer_name), \
                 customer_tax_id = COALESCE(?7, customer_tax_id), \
                 customer_address = COALESCE(?8, customer_address), \
                 payment_method_id = COALESCE(?9, payment_method_id), \
                 sales_agent_id = COALESCE(?10, sales_agent_id), \
                 notes = COALESCE(?11, notes), \
                 updated_at = ?12 \
             WHERE id = ?1 AND tenant_id = ?2 AND status = ?13 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.series)
            .bind(input.issue_date)
            .bind(input.due_date)
            .bind(&input.customer_name)
            .bind(&input.customer_tax_id)
            .bind(&input.customer_address)
            .bind(input.payment_method_id)
            .bind(input.sales_agent_id)
            .bind(&input.notes)
            .bind(Utc::now())
            .bind(STATUS_DRAFT)
            .fetch_optional(pool)
            .await
    }

    /// Replace the lines of a draft and store the new totals.
    ///
    /// Returns `false` when the invoice is missing or no longer a draft.
    pub async fn replace_lines(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        lines: &[ComputedLine],
        totals: &DocumentTotals,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE invoices SET subtotal = ?3, tax_total = ?4, total = ?5, updated_at = ?6 \
             WHERE id = ?1 AND tenant_id = ?2 AND status = ?7",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(totals.subtotal)
        .bind(totals.tax_total)
        .bind(totals.total)
        .bind(Utc::now())
        .bind(STATUS_DRAFT)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        DocumentLineRepo::replace(&mut tx, LineTable::Invoice, id, lines).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Issue a draft: assign the next consecutive number of its series and
    /// fiscal year (the issue date's year) and build the code.
    ///
    /// Returns `None` when the invoice is missing or no longer a draft.
    pub async fn issue(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = ?1 AND tenant_id = ?2 AND status = ?3"
        );
        let Some(draft) = sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(STATUS_DRAFT)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let year = draft.issue_date.year();
        let number: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(number), 0) + 1 FROM invoices \
             WHERE tenant_id = ?1 AND series = ?2 AND fiscal_year = ?3",
        )
        .bind(tenant_id)
        .bind(&draft.series)
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;

        let now = Utc::now();
        let query = format!(
            "UPDATE invoices SET status = ?3, fiscal_year = ?4, number = ?5, code = ?6, \
                 issued_at = ?7, updated_at = ?7 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        let issued = sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(STATUS_ISSUED)
            .bind(year)
            .bind(number)
            .bind(invoice::format_code(&draft.series, year, number))
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(issued))
    }

    /// Cancel a draft or issued invoice. Issued invoices keep their number.
    pub async fn cancel(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET status = ?3, updated_at = ?4 \
             WHERE id = ?1 AND tenant_id = ?2 AND status IN (?5, ?6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(STATUS_CANCELLED)
            .bind(Utc::now())
            .bind(STATUS_DRAFT)
            .bind(STATUS_ISSUED)
            .fetch_optional(pool)
            .await
    }

    /// Delete a draft (its lines cascade).
    pub async fn delete_draft(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1 AND tenant_id = ?2 AND status = ?3")
            .bind(id)
            .bind(tenant_id)
            .bind(STATUS_DRAFT)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an issued invoice as paid on the caller's connection.
    pub(crate) async fn mark_paid(
        conn: &mut SqliteConnection,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE invoices SET status = ?3, updated_at = ?4 \
             WHERE id = ?1 AND tenant_id = ?2 AND status = ?5",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(STATUS_PAID)
        .bind(Utc::now())
        .bind(STATUS_ISSUED)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
