//! Repository for the `sales_agents` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::{Date, DbId};

use crate::models::sales_agent::{
    CommissionInvoice, CreateSalesAgent, SalesAgent, UpdateSalesAgent,
};
use crate::models::{ListFilter, Page};

/// Column list for `sales_agents` queries.
const COLUMNS: &str = "\
    id, code, name, tax_id, email, phone, commission_percent, notes, \
    is_active, created_at, updated_at";

const LIST_FILTER: &str = "\
    tenant_id = ?1 AND deleted_at IS NULL \
    AND (?2 IS NULL OR name LIKE ?2 ESCAPE '\\' OR code LIKE ?2 ESCAPE '\\' \
         OR email LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR is_active = ?3)";

/// Provides CRUD operations for sales agents.
pub struct SalesAgentRepo;

impl SalesAgentRepo {
    /// List live agents ordered by name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<SalesAgent>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM sales_agents WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM sales_agents WHERE {LIST_FILTER} \
             ORDER BY name, id LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, SalesAgent>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live agent by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<SalesAgent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sales_agents \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, SalesAgent>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new agent.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateSalesAgent,
    ) -> Result<SalesAgent, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales_agents \
                 (tenant_id, code, name, tax_id, email, phone, commission_percent, notes, \
                  is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, 0), ?8, COALESCE(?9, 1), ?10, ?10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SalesAgent>(&query)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.commission_percent)
            .bind(&input.notes)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Update an agent. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateSalesAgent,
    ) -> Result<Option<SalesAgent>, sqlx::Error> {
        let query = format!(
            "UPDATE sales_agents SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 tax_id = COALESCE(?5, tax_id), \
                 email = COALESCE(?6, email), \
                 phone = COALESCE(?7, phone), \
                 commission_percent = COALESCE(?8, commission_percent), \
                 notes = COALESCE(?9, notes), \
                 is_active = COALESCE(?10, is_active), \
                 updated_at = ?11 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SalesAgent>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.tax_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.commission_percent)
            .bind(&input.notes)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an agent. Returns `true` if a live row was deleted.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sales_agents SET deleted_at = ?3, updated_at = ?3 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Billed (issued or paid) invoices of an agent with an issue date in
    /// `[from, to]`; either bound may be open.
    pub async fn billed_invoices(
        pool: &SqlitePool,
        tenant_id: DbId,
        agent_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<CommissionInvoice>, sqlx::Error> {
        sqlx::query_as::<_, CommissionInvoice>(
            "SELECT id AS invoice_id, code, issue_date, customer_name, status, subtotal \
             FROM invoices \
             WHERE tenant_id = ?1 AND sales_agent_id = ?2 \
               AND status IN ('issued', 'paid') \
               AND (?3 IS NULL OR issue_date >= ?3) \
               AND (?4 IS NULL OR issue_date <= ?4) \
             ORDER BY issue_date, id",
        )
        .bind(tenant_id)
        .bind(agent_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
