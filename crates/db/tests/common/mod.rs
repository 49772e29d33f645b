//! Shared helpers for repository integration tests.
//!
//! Every test gets a private in-memory database with migrations applied.

#![allow(dead_code)]

use chrono::NaiveDate;
use gestora_db::models::tenant::Tenant;
use gestora_db::repositories::TenantRepo;
use gestora_db::DbPool;

pub async fn pool() -> DbPool {
    gestora_db::create_memory_pool()
        .await
        .expect("in-memory database should open")
}

pub async fn tenant(pool: &DbPool, slug: &str) -> Tenant {
    TenantRepo::create(pool, slug, &format!("Tenant {slug}"))
        .await
        .expect("tenant insert should succeed")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Whether a sqlx error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
