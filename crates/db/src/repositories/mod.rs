//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument. Methods touching a
//! business table take the caller's `tenant_id` and filter on it, so rows
//! of other tenants behave exactly like missing rows.

pub mod bank_movement_repo;
pub mod document_line_repo;
pub mod grid_preference_repo;
pub mod invoice_repo;
pub mod payment_method_repo;
pub mod preparation_zone_repo;
pub mod price_list_repo;
pub mod product_family_repo;
pub mod sales_agent_repo;
pub mod session_repo;
pub mod shift_repo;
pub mod stock_movement_repo;
pub mod supplier_repo;
pub mod tenant_repo;
pub mod user_repo;
pub mod work_order_repo;

pub use bank_movement_repo::BankMovementRepo;
pub use document_line_repo::{DocumentLineRepo, LineTable};
pub use grid_preference_repo::GridPreferenceRepo;
pub use invoice_repo::InvoiceRepo;
pub use payment_method_repo::PaymentMethodRepo;
pub use preparation_zone_repo::PreparationZoneRepo;
pub use price_list_repo::PriceListRepo;
pub use product_family_repo::ProductFamilyRepo;
pub use sales_agent_repo::SalesAgentRepo;
pub use session_repo::SessionRepo;
pub use shift_repo::ShiftRepo;
pub use stock_movement_repo::StockMovementRepo;
pub use supplier_repo::SupplierRepo;
pub use tenant_repo::TenantRepo;
pub use user_repo::UserRepo;
pub use work_order_repo::WorkOrderRepo;
