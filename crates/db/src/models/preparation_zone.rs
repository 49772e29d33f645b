//! Preparation zone models and DTOs.
//!
//! A preparation zone is a kitchen or bar station that product families are
//! routed to (grill, bar, cold kitchen). Zones can drive a kitchen display.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A live row from `preparation_zones`, with the number of live families
/// routed to it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PreparationZone {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: i64,
    pub kds_enabled: bool,
    pub printer_name: Option<String>,
    pub is_active: bool,
    pub family_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a preparation zone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePreparationZone {
    pub code: String,
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i64>,
    pub kds_enabled: Option<bool>,
    #[validate(length(max = 120))]
    pub printer_name: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a preparation zone. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePreparationZone {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i64>,
    pub kds_enabled: Option<bool>,
    #[validate(length(max = 120))]
    pub printer_name: Option<String>,
    pub is_active: Option<bool>,
}
