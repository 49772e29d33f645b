//! Work order (parte de trabajo) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::document_lines::{DocumentTotals, LineInput};
use gestora_core::planning::Schedulable;
use gestora_core::types::{Date, DbId, Timestamp};

use super::document_line::DocumentLine;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from `work_orders`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub id: DbId,
    pub number: String,
    pub customer_name: String,
    pub description: Option<String>,
    pub status: String,
    pub scheduled_date: Option<Date>,
    pub due_date: Option<Date>,
    pub completed_date: Option<Date>,
    pub sales_agent_id: Option<DbId>,
    pub technician: Option<String>,
    pub subtotal: f64,
    pub tax_total: f64,
    pub total: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Schedulable for WorkOrder {
    fn id(&self) -> DbId {
        self.id
    }
    fn scheduled_on(&self) -> Option<Date> {
        self.scheduled_date
    }
    fn due_on(&self) -> Option<Date> {
        self.due_date
    }
    fn ordering_key(&self) -> &str {
        &self.number
    }
}

/// A work order with its lines and totals breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct WorkOrderDetail {
    #[serde(flatten)]
    pub order: WorkOrder,
    pub lines: Vec<DocumentLine>,
    pub totals: DocumentTotals,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a work order. The number is assigned by the server.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkOrder {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub scheduled_date: Option<Date>,
    pub due_date: Option<Date>,
    pub sales_agent_id: Option<DbId>,
    #[validate(length(max = 120))]
    pub technician: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

/// DTO for updating a work order header.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkOrder {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub scheduled_date: Option<Date>,
    pub due_date: Option<Date>,
    pub sales_agent_id: Option<DbId>,
    #[validate(length(max = 120))]
    pub technician: Option<String>,
}

/// Request body for `POST /work-orders/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    /// Completion date; defaults to today when moving to `completed`.
    pub completed_date: Option<Date>,
}

/// Request body for `POST /work-orders/{id}/invoice`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceWorkOrderRequest {
    pub series: Option<String>,
    pub issue_date: Option<Date>,
    pub payment_method_id: Option<DbId>,
}

/// Filters accepted by the work order list.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderFilter {
    pub status: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub search: Option<String>,
}
