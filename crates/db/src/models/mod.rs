//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod bank_movement;
pub mod document_line;
pub mod grid_preference;
pub mod invoice;
pub mod payment_method;
pub mod preparation_zone;
pub mod price_list;
pub mod product_family;
pub mod sales_agent;
pub mod session;
pub mod shift;
pub mod stock_movement;
pub mod supplier;
pub mod tenant;
pub mod user;
pub mod work_order;

/// One page of rows plus the total number of rows matching the filter.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Filters shared by the master-data list endpoints.
///
/// `search` is an already-escaped `LIKE` pattern (see
/// [`gestora_core::pagination::search_pattern`]).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub active: Option<bool>,
}
