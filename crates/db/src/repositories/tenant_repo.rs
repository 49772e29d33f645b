//! Repository for the `tenants` table.

use chrono::Utc;
use sqlx::SqlitePool;
use gestora_core::types::DbId;

use crate::models::tenant::Tenant;

/// Column list for `tenants` queries.
const COLUMNS: &str = "id, slug, name, is_active, created_at, updated_at";

/// Provides data access for tenants.
pub struct TenantRepo;

impl TenantRepo {
    /// Find a tenant by its slug.
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE slug = ?1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a tenant by id.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = ?1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new active tenant.
    pub async fn create(pool: &SqlitePool, slug: &str, name: &str) -> Result<Tenant, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO tenants (slug, name, is_active, created_at, updated_at) \
             VALUES (?1, ?2, 1, ?3, ?3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .bind(name)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Enable or disable a tenant. Returns `true` if a row was updated.
    pub async fn set_active(pool: &SqlitePool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tenants SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
