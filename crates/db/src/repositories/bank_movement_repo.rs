//! Repository for the `bank_movements` table.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use gestora_core::bank;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::bank_movement::{
    BankMovement, BankMovementFilter, CreateBankMovement, UpdateBankMovement,
};
use crate::models::Page;
use crate::repositories::InvoiceRepo;

/// Column list for `bank_movements` queries.
const COLUMNS: &str = "\
    id, account, movement_date, value_date, concept, amount, reference, category, \
    reconciled, invoice_id, created_at, updated_at";

/// Filter: `?1` tenant, `?2` account, `?3`/`?4` date range, `?5` reconciled,
/// `?6` search.
const LIST_FILTER: &str = "\
    tenant_id = ?1 \
    AND (?2 IS NULL OR account = ?2) \
    AND (?3 IS NULL OR movement_date >= ?3) \
    AND (?4 IS NULL OR movement_date <= ?4) \
    AND (?5 IS NULL OR reconciled = ?5) \
    AND (?6 IS NULL OR concept LIKE ?6 ESCAPE '\\' OR reference LIKE ?6 ESCAPE '\\')";

/// Outcome of reconciling a movement against an invoice.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub movement: BankMovement,
    /// Sum of all reconciled movements linked to the invoice.
    pub paid_amount: f64,
    /// Whether this reconciliation settled the invoice.
    pub invoice_paid: bool,
}

/// Provides data access for bank movements.
pub struct BankMovementRepo;

impl BankMovementRepo {
    /// List movements, most recent first.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &BankMovementFilter,
        page: &PageRequest,
    ) -> Result<Page<BankMovement>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM bank_movements WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.account)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.reconciled)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM bank_movements WHERE {LIST_FILTER} \
             ORDER BY movement_date DESC, id DESC LIMIT ?7 OFFSET ?8"
        );
        let items = sqlx::query_as::<_, BankMovement>(&query)
            .bind(tenant_id)
            .bind(&filter.account)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.reconciled)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Income/expense totals of the movements matching `filter`.
    pub async fn summary(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &BankMovementFilter,
    ) -> Result<bank::MovementSummary, sqlx::Error> {
        let query = format!("SELECT amount FROM bank_movements WHERE {LIST_FILTER}");
        let amounts: Vec<f64> = sqlx::query_scalar(&query)
            .bind(tenant_id)
            .bind(&filter.account)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.reconciled)
            .bind(&filter.search)
            .fetch_all(pool)
            .await?;
        Ok(bank::summarize(&amounts))
    }

    /// Find a movement by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<BankMovement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bank_movements WHERE id = ?1 AND tenant_id = ?2");
        sqlx::query_as::<_, BankMovement>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new, unreconciled movement.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateBankMovement,
    ) -> Result<BankMovement, sqlx::Error> {
        let query = format!(
            "INSERT INTO bank_movements \
                 (tenant_id, account, movement_date, value_date, concept, amount, reference, \
                  category, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BankMovement>(&query)
            .bind(tenant_id)
            .bind(&input.account)
            .bind(input.movement_date)
            .bind(input.value_date)
            .bind(&input.concept)
            .bind(input.amount)
            .bind(&input.reference)
            .bind(&input.category)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Update a movement. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateBankMovement,
    ) -> Result<Option<BankMovement>, sqlx::Error> {
        let query = format!(
            "UPDATE bank_movements SET \
                 account = COALESCE(?3, account), \
                 movement_date = COALESCE(?4, movement_date), \
                 value_date = COALESCE(?5, value_date), \
                 concept = COALESCE(?6, concept), \
                 amount = COALESCE(?7, amount), \
                 reference = COALESCE(?8, reference), \
                 category = COALESCE(?9, category), \
                 updated_at = ?10 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BankMovement>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.account)
            .bind(input.movement_date)
            .bind(input.value_date)
            .bind(&input.concept)
            .bind(input.amount)
            .bind(&input.reference)
            .bind(&input.category)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a movement.
    pub async fn delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bank_movements WHERE id = ?1 AND tenant_id = ?2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link an unreconciled movement to an invoice and mark it reconciled.
    /// When the reconciled movements now cover the invoice total, the
    /// invoice becomes paid.
    ///
    /// Returns `None` when the movement is missing or already reconciled.
    pub async fn reconcile(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        invoice_id: DbId,
        invoice_total: f64,
    ) -> Result<Option<Reconciliation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bank_movements SET reconciled = 1, invoice_id = ?3, updated_at = ?4 \
             WHERE id = ?1 AND tenant_id = ?2 AND reconciled = 0 \
             RETURNING {COLUMNS}"
        );
        let Some(movement) = sqlx::query_as::<_, BankMovement>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(invoice_id)
            .bind(Utc::now())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let paid_amount: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM bank_movements \
             WHERE tenant_id = ?1 AND invoice_id = ?2 AND reconciled = 1",
        )
        .bind(tenant_id)
        .bind(invoice_id)
        .fetch_one(&mut *tx)
        .await?;

        let invoice_paid = bank::covers(paid_amount, invoice_total)
            && InvoiceRepo::mark_paid(&mut tx, tenant_id, invoice_id).await?;

        tx.commit().await?;
        Ok(Some(Reconciliation {
            movement,
            paid_amount,
            invoice_paid,
        }))
    }
}
