//! Product family models and DTOs.
//!
//! Families form a tree (`parent_id`) and may be routed to a preparation zone.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::types::{DbId, Timestamp};

/// A live row from `product_families`, joined with its zone and parent names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductFamily {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub parent_name: Option<String>,
    pub preparation_zone_id: Option<DbId>,
    pub preparation_zone_name: Option<String>,
    pub color: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product family.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductFamily {
    pub code: String,
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub preparation_zone_id: Option<DbId>,
    pub color: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// DTO for updating a product family.
///
/// `parent_id` and `preparation_zone_id` use `0` to detach; omitted fields
/// keep their current value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductFamily {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub preparation_zone_id: Option<DbId>,
    pub color: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}
