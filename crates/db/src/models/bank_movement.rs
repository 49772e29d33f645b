//! Bank movement models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::types::{Date, DbId, Timestamp};

/// A row from `bank_movements`. Positive amounts are income.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BankMovement {
    pub id: DbId,
    pub account: String,
    pub movement_date: Date,
    pub value_date: Option<Date>,
    pub concept: String,
    pub amount: f64,
    pub reference: Option<String>,
    pub category: Option<String>,
    pub reconciled: bool,
    pub invoice_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a bank movement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBankMovement {
    pub account: String,
    pub movement_date: Date,
    pub value_date: Option<Date>,
    #[validate(length(min = 1, max = 255))]
    pub concept: String,
    pub amount: f64,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

/// DTO for updating a bank movement. Reconciliation has its own endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBankMovement {
    pub account: Option<String>,
    pub movement_date: Option<Date>,
    pub value_date: Option<Date>,
    #[validate(length(min = 1, max = 255))]
    pub concept: Option<String>,
    pub amount: Option<f64>,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

/// Request body for `POST /bank-movements/{id}/reconcile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileRequest {
    pub invoice_id: DbId,
}

/// Filters accepted by the movement list and summary.
#[derive(Debug, Clone, Default)]
pub struct BankMovementFilter {
    pub account: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub reconciled: Option<bool>,
    pub search: Option<String>,
}
