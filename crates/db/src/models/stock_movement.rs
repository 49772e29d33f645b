//! Stock movement models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::stock::MovementShape;
use gestora_core::types::{Date, DbId, Timestamp};

/// A row from `stock_movements`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockMovement {
    pub id: DbId,
    pub product_code: String,
    pub product_name: Option<String>,
    pub warehouse: String,
    pub destination_warehouse: Option<String>,
    pub kind: String,
    pub quantity: f64,
    pub unit_cost: Option<f64>,
    pub movement_date: Date,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StockMovement {
    pub fn shape(&self) -> MovementShape<'_> {
        MovementShape {
            kind: &self.kind,
            quantity: self.quantity,
            warehouse: &self.warehouse,
            destination_warehouse: self.destination_warehouse.as_deref(),
            unit_cost: self.unit_cost,
        }
    }
}

/// On-hand quantity of one product in one warehouse.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockLevel {
    pub product_code: String,
    pub warehouse: String,
    pub quantity: f64,
}

/// DTO for creating a stock movement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStockMovement {
    #[validate(length(min = 1, max = 40))]
    pub product_code: String,
    #[validate(length(max = 200))]
    pub product_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub warehouse: String,
    #[validate(length(min = 1, max = 64))]
    pub destination_warehouse: Option<String>,
    pub kind: String,
    pub quantity: f64,
    pub unit_cost: Option<f64>,
    pub movement_date: Date,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateStockMovement {
    pub fn shape(&self) -> MovementShape<'_> {
        MovementShape {
            kind: &self.kind,
            quantity: self.quantity,
            warehouse: &self.warehouse,
            destination_warehouse: self.destination_warehouse.as_deref(),
            unit_cost: self.unit_cost,
        }
    }
}

/// DTO for updating a stock movement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStockMovement {
    #[validate(length(min = 1, max = 40))]
    pub product_code: Option<String>,
    #[validate(length(max = 200))]
    pub product_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub warehouse: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub destination_warehouse: Option<String>,
    pub kind: Option<String>,
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    pub movement_date: Option<Date>,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Filters accepted by the movement list.
#[derive(Debug, Clone, Default)]
pub struct StockMovementFilter {
    pub product_code: Option<String>,
    pub warehouse: Option<String>,
    pub kind: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub search: Option<String>,
}
