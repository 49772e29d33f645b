//! Per-user grid layout preferences.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use gestora_core::grid::GridColumn;
use gestora_core::types::{DbId, Timestamp};

/// A row from `grid_preferences`; `columns` is stored as a JSON array.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GridPreference {
    pub id: DbId,
    pub grid_key: String,
    pub columns: Json<Vec<GridColumn>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /preferences/grids/{grid_key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertGridPreference {
    pub columns: Vec<GridColumn>,
}
