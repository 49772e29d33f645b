//! Supplier models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::types::{DbId, Timestamp};

/// A live row from `suppliers`, with the name of its default payment method.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Supplier {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub trade_name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub payment_method_id: Option<DbId>,
    pub payment_method_name: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a supplier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplier {
    pub code: String,
    pub name: String,
    #[validate(length(max = 120))]
    pub trade_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(length(max = 16))]
    pub postal_code: Option<String>,
    #[validate(length(max = 120))]
    pub province: Option<String>,
    #[validate(length(max = 120))]
    pub country: Option<String>,
    pub payment_method_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a supplier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSupplier {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub trade_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(length(max = 16))]
    pub postal_code: Option<String>,
    #[validate(length(max = 120))]
    pub province: Option<String>,
    #[validate(length(max = 120))]
    pub country: Option<String>,
    pub payment_method_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}
