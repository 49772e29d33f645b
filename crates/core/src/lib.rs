//! Domain rules for the Gestora ERP backend.
//!
//! Everything in this crate is pure: no IO, no database, no HTTP. The `db`
//! and `api` crates call into these functions to validate input and derive
//! amounts before anything is persisted.

pub mod bank;
pub mod document_lines;
pub mod error;
pub mod grid;
pub mod invoice;
pub mod money;
pub mod pagination;
pub mod payment_terms;
pub mod planning;
pub mod pricing;
pub mod roles;
pub mod shifts;
pub mod stock;
pub mod tenancy;
pub mod types;
pub mod validation;
pub mod work_order;
