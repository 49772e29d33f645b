//! Repository for the document line tables (`invoice_lines`,
//! `work_order_lines`), which share one layout.

use sqlx::{SqliteConnection, SqlitePool};
use gestora_core::document_lines::ComputedLine;
use gestora_core::types::DbId;

use crate::models::document_line::DocumentLine;

/// Column list shared by both line tables.
const COLUMNS: &str = "\
    id, position, product_code, description, quantity, unit_price, \
    discount_percent, tax_rate, net_amount, tax_amount, total_amount";

/// Which document a set of lines belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTable {
    Invoice,
    WorkOrder,
}

impl LineTable {
    fn table(self) -> &'static str {
        match self {
            LineTable::Invoice => "invoice_lines",
            LineTable::WorkOrder => "work_order_lines",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            LineTable::Invoice => "invoice_id",
            LineTable::WorkOrder => "work_order_id",
        }
    }
}

/// Provides read and replace operations for document lines.
pub struct DocumentLineRepo;

impl DocumentLineRepo {
    /// Lines of one document in position order.
    ///
    /// Callers must have checked that the parent belongs to their tenant.
    pub async fn list(
        pool: &SqlitePool,
        table: LineTable,
        parent_id: DbId,
    ) -> Result<Vec<DocumentLine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE {} = ?1 ORDER BY position",
            table.table(),
            table.parent_column()
        );
        sqlx::query_as::<_, DocumentLine>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Delete the document's lines and insert `lines` in their place.
    ///
    /// Runs on the caller's connection so it can join a transaction.
    pub async fn replace(
        conn: &mut SqliteConnection,
        table: LineTable,
        parent_id: DbId,
        lines: &[ComputedLine],
    ) -> Result<(), sqlx::Error> {
        let delete = format!("DELETE FROM {} WHERE {} = ?1", table.table(), table.parent_column());
        sqlx::query(&delete).bind(parent_id).execute(&mut *conn).await?;

        let insert = format!(
            "INSERT INTO {} \
                 ({}, position, product_code, description, quantity, unit_price, \
                  discount_percent, tax_rate, net_amount, tax_amount, total_amount) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            table.table(),
            table.parent_column()
        );
        for line in lines {
            sqlx::query(&insert)
                .bind(parent_id)
                .bind(line.position)
                .bind(&line.product_code)
                .bind(&line.description)
                .bind(line.quantity)
                .bind(line.unit_price)
                .bind(line.discount_percent)
                .bind(line.tax_rate)
                .bind(line.net_amount)
                .bind(line.tax_amount)
                .bind(line.total_amount)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}
