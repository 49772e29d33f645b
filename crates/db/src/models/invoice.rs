//! Invoice models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::document_lines::{DocumentTotals, LineInput};
use gestora_core::types::{Date, DbId, Timestamp};

use super::document_line::DocumentLine;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from `invoices`. `number`, `fiscal_year` and `code` stay null
/// until the invoice is issued.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub series: String,
    pub fiscal_year: Option<i64>,
    pub number: Option<i64>,
    pub code: Option<String>,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    pub customer_name: String,
    pub customer_tax_id: Option<String>,
    pub customer_address: Option<String>,
    pub payment_method_id: Option<DbId>,
    pub sales_agent_id: Option<DbId>,
    pub work_order_id: Option<DbId>,
    pub status: String,
    pub notes: Option<String>,
    pub subtotal: f64,
    pub tax_total: f64,
    pub total: f64,
    pub issued_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An invoice with its lines and tax breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub lines: Vec<DocumentLine>,
    pub totals: DocumentTotals,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a draft invoice.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoice {
    pub series: Option<String>,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(max = 32))]
    pub customer_tax_id: Option<String>,
    #[validate(length(max = 255))]
    pub customer_address: Option<String>,
    pub payment_method_id: Option<DbId>,
    pub sales_agent_id: Option<DbId>,
    pub work_order_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

/// DTO for updating a draft invoice header.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoice {
    pub series: Option<String>,
    pub issue_date: Option<Date>,
    pub due_date: Option<Date>,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(max = 32))]
    pub customer_tax_id: Option<String>,
    #[validate(length(max = 255))]
    pub customer_address: Option<String>,
    pub payment_method_id: Option<DbId>,
    pub sales_agent_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request body for `PUT /invoices/{id}/lines` and the work order equivalent.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceLinesRequest {
    pub lines: Vec<LineInput>,
}

/// Request body for `POST /invoices/{id}/lines/move`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveLineRequest {
    pub from: usize,
    pub to: usize,
}

/// Filters accepted by the invoice list.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<String>,
    pub series: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub search: Option<String>,
}
