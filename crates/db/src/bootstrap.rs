//! First-run provisioning of a tenant and its administrator.

use sqlx::SqlitePool;
use gestora_core::roles::ROLE_ADMIN;

use crate::models::tenant::Tenant;
use crate::models::user::{CreateUser, User};
use crate::repositories::{TenantRepo, UserRepo};

/// What [`ensure_tenant_admin`] found or created.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub tenant: Tenant,
    pub admin: User,
    pub tenant_created: bool,
    pub admin_created: bool,
}

/// Make sure the tenant `slug` exists and has a user `email`.
///
/// Idempotent: existing rows are returned untouched, so a changed password
/// hash is never written over an existing account.
pub async fn ensure_tenant_admin(
    pool: &SqlitePool,
    slug: &str,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<BootstrapOutcome, sqlx::Error> {
    let (tenant, tenant_created) = match TenantRepo::find_by_slug(pool, slug).await? {
        Some(t) => (t, false),
        None => (TenantRepo::create(pool, slug, name).await?, true),
    };

    let (admin, admin_created) = match UserRepo::find_by_email(pool, tenant.id, email).await? {
        Some(u) => (u, false),
        None => {
            let input = CreateUser {
                email: email.to_string(),
                display_name: "Administrator".to_string(),
                password_hash: password_hash.to_string(),
                role: ROLE_ADMIN.to_string(),
            };
            (UserRepo::create(pool, tenant.id, &input).await?, true)
        }
    };

    if tenant_created || admin_created {
        tracing::info!(
            tenant = %tenant.slug,
            admin = %admin.email,
            tenant_created,
            admin_created,
            "Bootstrap provisioning applied"
        );
    }

    Ok(BootstrapOutcome {
        tenant,
        admin,
        tenant_created,
        admin_created,
    })
}
