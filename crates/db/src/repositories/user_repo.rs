//! Repository for the `users` table.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use gestora_core::pagination::PageRequest;
use gestora_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::models::{ListFilter, Page};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, tenant_id, email, display_name, password_hash, role, is_active, \
    failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Failed attempts allowed before the account is locked.
pub const MAX_FAILED_LOGINS: i64 = 5;

/// How long a locked account stays locked.
pub const LOCK_DURATION_MINS: i64 = 15;

/// Provides data access for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by id within a tenant.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1 AND tenant_id = ?2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id regardless of tenant. Only used to resolve the
    /// owner of a refresh-token session.
    pub async fn find_by_id_unscoped(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email within a tenant (case-insensitive).
    pub async fn find_by_email(
        pool: &SqlitePool,
        tenant_id: DbId,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE tenant_id = ?1 AND email = lower(?2)"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users of a tenant, ordered by display name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        let filter_sql = "tenant_id = ?1 \
             AND (?2 IS NULL OR email LIKE ?2 ESCAPE '\\' OR display_name LIKE ?2 ESCAPE '\\') \
             AND (?3 IS NULL OR is_active = ?3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {filter_sql}"))
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {filter_sql} \
             ORDER BY display_name, id LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, User>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Insert a new user. The email is stored lower-cased.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                 (tenant_id, email, display_name, password_hash, role, created_at, updated_at) \
             VALUES (?1, lower(?2), ?3, ?4, ?5, ?6, ?6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Update a user. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 display_name = COALESCE(?3, display_name), \
                 role = COALESCE(?4, role), \
                 is_active = COALESCE(?5, is_active), \
                 updated_at = ?6 \
             WHERE id = ?1 AND tenant_id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(tenant_id)
            .bind(&input.display_name)
            .bind(&input.role)
            .bind(input.is_active)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash.
    pub async fn update_password(
        pool: &SqlitePool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate a user. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = 0, updated_at = ?3 WHERE id = ?1 AND tenant_id = ?2",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count active admins of a tenant.
    pub async fn count_active_admins(pool: &SqlitePool, tenant_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE tenant_id = ?1 AND role = 'admin' AND is_active = 1",
        )
        .bind(tenant_id)
        .fetch_one(pool)
        .await
    }

    /// Record a failed login, locking the account once the limit is reached.
    pub async fn record_failed_login(pool: &SqlitePool, id: DbId) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let lock_until = now + Duration::minutes(LOCK_DURATION_MINS);
        sqlx::query(
            "UPDATE users SET \
                 failed_login_count = failed_login_count + 1, \
                 locked_until = CASE WHEN failed_login_count + 1 >= ?2 THEN ?3 ELSE locked_until END, \
                 updated_at = ?4 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(MAX_FAILED_LOGINS)
        .bind(lock_until)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Reset the failure counter and stamp the login time.
    pub async fn record_successful_login(pool: &SqlitePool, id: DbId) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, \
                 last_login_at = ?2, updated_at = ?2 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }
}
