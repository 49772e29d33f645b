//! Tenant entity model.

use serde::Serialize;
use sqlx::FromRow;
use gestora_core::types::{DbId, Timestamp};

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
