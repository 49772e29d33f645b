//! Integration tests for first-run tenant provisioning.

mod common;

use gestora_db::bootstrap::ensure_tenant_admin;
use gestora_db::repositories::UserRepo;

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let pool = common::pool().await;

    let first = ensure_tenant_admin(&pool, "acme", "Acme", "Admin@Acme.test", "hash-1")
        .await
        .unwrap();
    assert!(first.tenant_created);
    assert!(first.admin_created);
    assert_eq!(first.admin.role, "admin");
    assert_eq!(first.admin.email, "admin@acme.test");

    let second = ensure_tenant_admin(&pool, "acme", "Acme", "admin@acme.test", "hash-2")
        .await
        .unwrap();
    assert!(!second.tenant_created);
    assert!(!second.admin_created);
    assert_eq!(second.tenant.id, first.tenant.id);
    assert_eq!(second.admin.password_hash, "hash-1");

    let found = UserRepo::find_by_email(&pool, first.tenant.id, "ADMIN@acme.test")
        .await
        .unwrap();
    assert!(found.is_some());
}
