//! Payment method models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::payment_terms::PaymentTerms;
use gestora_core::types::{DbId, Timestamp};

/// A live row from `payment_methods`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentMethod {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub installments: i64,
    pub first_due_days: i64,
    pub days_between: i64,
    pub surcharge_percent: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentMethod {
    /// The instalment terms this method applies to a document.
    pub fn terms(&self) -> PaymentTerms {
        PaymentTerms {
            installments: self.installments,
            first_due_days: self.first_due_days,
            days_between: self.days_between,
        }
    }
}

/// DTO for creating a payment method.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentMethod {
    pub code: String,
    pub name: String,
    pub kind: String,
    pub installments: Option<i64>,
    pub first_due_days: Option<i64>,
    pub days_between: Option<i64>,
    pub surcharge_percent: Option<f64>,
    pub is_active: Option<bool>,
}

/// DTO for updating a payment method.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePaymentMethod {
    pub code: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub installments: Option<i64>,
    pub first_due_days: Option<i64>,
    pub days_between: Option<i64>,
    pub surcharge_percent: Option<f64>,
    pub is_active: Option<bool>,
}
