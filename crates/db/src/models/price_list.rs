//! Price list (pricing plan) models and DTOs.
//!
//! Item prices are always stored fully resolved: the client sends cost, tax
//! and one price driver, and the remaining prices are derived on write.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::pricing::{ItemPrices, PriceDriver};
use gestora_core::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A live row from `price_lists` with its item count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceList {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub is_default: bool,
    pub is_active: bool,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `price_list_items`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceListItem {
    pub id: DbId,
    pub price_list_id: DbId,
    pub product_code: String,
    pub product_name: String,
    pub cost_price: f64,
    pub sale_price: f64,
    pub tax_rate: f64,
    pub margin_percent: f64,
    pub retail_price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PriceListItem {
    pub fn prices(&self) -> ItemPrices {
        ItemPrices {
            cost_price: self.cost_price,
            sale_price: self.sale_price,
            margin_percent: self.margin_percent,
            tax_rate: self.tax_rate,
            retail_price: self.retail_price,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a price list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePriceList {
    pub code: String,
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

/// DTO for updating a price list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePriceList {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

/// Request body for creating or updating an item.
///
/// Exactly one price driver is carried in `price`, e.g.
/// `{"driver": "margin", "value": 40}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemRequest {
    #[validate(length(min = 1, max = 40))]
    pub product_code: String,
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    pub cost_price: f64,
    #[serde(default)]
    pub tax_rate: f64,
    pub price: PriceDriver,
}

/// A resolved item ready to be written.
#[derive(Debug, Clone)]
pub struct UpsertItem {
    pub product_code: String,
    pub product_name: String,
    pub prices: ItemPrices,
}

/// Request body for `POST /price-lists/{id}/reprice`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepriceRequest {
    pub percent: f64,
}
