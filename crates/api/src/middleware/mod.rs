//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller behind a JWT Bearer token.
//! - [`tenant::TenantUser`] -- an authenticated caller inside the tenant
//!   named by the `x-tenant-id` header.
//! - [`rbac::RequireAdmin`] -- a tenant user with the `admin` role.

pub mod auth;
pub mod rbac;
pub mod tenant;
