//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with the rules in `gestora_core`, delegate to the
//! repositories in `gestora_db` and map errors via [`AppError`].

pub mod auth;
pub mod bank_movements;
pub mod invoices;
pub mod payment_methods;
pub mod planning;
pub mod preferences;
pub mod preparation_zones;
pub mod price_lists;
pub mod product_families;
pub mod sales_agents;
pub mod shifts;
pub mod stock_movements;
pub mod suppliers;
pub mod users;
pub mod work_orders;

use gestora_core::error::CoreError;
use gestora_core::types::DbId;

use crate::error::AppError;

/// A foreign key in the request body points at a row the tenant does not
/// have. Reported as a validation error rather than a 404 of the resource
/// being written.
pub(crate) fn missing_reference(field: &str, id: DbId) -> AppError {
    AppError::Core(CoreError::Validation(format!("{field} {id} does not exist")))
}
