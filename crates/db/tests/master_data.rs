//! Integration tests for the master-data repositories: tenant scoping,
//! soft delete, partial unique indexes and the family tree.

mod common;

use assert_matches::assert_matches;
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_db::models::payment_method::CreatePaymentMethod;
use gestora_db::models::preparation_zone::{CreatePreparationZone, UpdatePreparationZone};
use gestora_db::models::product_family::CreateProductFamily;
use gestora_db::models::supplier::CreateSupplier;
use gestora_db::models::ListFilter;
use gestora_db::repositories::product_family_repo::FamilyFilter;
use gestora_db::repositories::{
    PaymentMethodRepo, PreparationZoneRepo, ProductFamilyRepo, SupplierRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn zone(code: &str, name: &str, sort_order: i64) -> CreatePreparationZone {
    CreatePreparationZone {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        color: Some("#FF8800".to_string()),
        sort_order: Some(sort_order),
        kds_enabled: None,
        printer_name: None,
        is_active: None,
    }
}

fn family(code: &str, parent_id: Option<i64>, zone_id: Option<i64>) -> CreateProductFamily {
    CreateProductFamily {
        code: code.to_string(),
        name: format!("Family {code}"),
        description: None,
        parent_id,
        preparation_zone_id: zone_id,
        color: None,
        sort_order: None,
        is_active: None,
    }
}

fn supplier(code: &str, tax_id: Option<&str>, method: Option<i64>) -> CreateSupplier {
    CreateSupplier {
        code: code.to_string(),
        name: format!("Supplier {code}"),
        trade_name: None,
        tax_id: tax_id.map(str::to_string),
        email: None,
        phone: None,
        address: None,
        city: None,
        postal_code: None,
        province: None,
        country: None,
        payment_method_id: method,
        notes: None,
        is_active: None,
    }
}

// ---------------------------------------------------------------------------
// Preparation zones
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zone_defaults_and_ordering() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    PreparationZoneRepo::create(&pool, t.id, &zone("BAR", "Bar", 2)).await.unwrap();
    let grill = PreparationZoneRepo::create(&pool, t.id, &zone("GRL", "Grill", 1)).await.unwrap();
    assert!(grill.kds_enabled);
    assert!(grill.is_active);
    assert_eq!(grill.family_count, 0);

    let page = PreparationZoneRepo::list(&pool, t.id, &ListFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let codes: Vec<_> = page.items.iter().map(|z| z.code.as_str()).collect();
    assert_eq!(codes, ["GRL", "BAR"]);
}

#[tokio::test]
async fn duplicate_zone_name_violates_unique_index() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    PreparationZoneRepo::create(&pool, t.id, &zone("Z1", "Kitchen", 0)).await.unwrap();
    let err = PreparationZoneRepo::create(&pool, t.id, &zone("Z2", "Kitchen", 0))
        .await
        .unwrap_err();
    assert!(common::is_unique_violation(&err));
}

#[tokio::test]
async fn soft_deleted_zone_frees_its_name() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let z = PreparationZoneRepo::create(&pool, t.id, &zone("Z1", "Kitchen", 0)).await.unwrap();
    assert!(PreparationZoneRepo::soft_delete(&pool, t.id, z.id).await.unwrap());
    assert!(!PreparationZoneRepo::soft_delete(&pool, t.id, z.id).await.unwrap());
    assert!(PreparationZoneRepo::find_by_id(&pool, t.id, z.id).await.unwrap().is_none());

    PreparationZoneRepo::create(&pool, t.id, &zone("Z1", "Kitchen", 0))
        .await
        .expect("name and code are reusable after soft delete");
}

#[tokio::test]
async fn zones_are_invisible_across_tenants() {
    let pool = common::pool().await;
    let a = common::tenant(&pool, "acme").await;
    let b = common::tenant(&pool, "globex").await;

    let z = PreparationZoneRepo::create(&pool, a.id, &zone("Z1", "Kitchen", 0)).await.unwrap();
    // Same name in another tenant is fine.
    PreparationZoneRepo::create(&pool, b.id, &zone("Z1", "Kitchen", 0)).await.unwrap();

    assert!(PreparationZoneRepo::find_by_id(&pool, b.id, z.id).await.unwrap().is_none());
    assert!(!PreparationZoneRepo::soft_delete(&pool, b.id, z.id).await.unwrap());

    let update = UpdatePreparationZone {
        code: None,
        name: Some("Hijacked".to_string()),
        description: None,
        color: None,
        sort_order: None,
        kds_enabled: None,
        printer_name: None,
        is_active: None,
    };
    assert!(PreparationZoneRepo::update(&pool, b.id, z.id, &update).await.unwrap().is_none());
}

#[tokio::test]
async fn zone_search_escapes_wildcards() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    PreparationZoneRepo::create(&pool, t.id, &zone("Z1", "Bar 100%", 0)).await.unwrap();
    PreparationZoneRepo::create(&pool, t.id, &zone("Z2", "Bar 1000", 0)).await.unwrap();

    let filter = ListFilter {
        search: search_pattern(Some("100%")),
        active: None,
    };
    let page = PreparationZoneRepo::list(&pool, t.id, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Bar 100%");
}

// ---------------------------------------------------------------------------
// Product families
// ---------------------------------------------------------------------------

#[tokio::test]
async fn family_joins_zone_and_counts_on_zone() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let z = PreparationZoneRepo::create(&pool, t.id, &zone("GRL", "Grill", 0)).await.unwrap();
    let f = ProductFamilyRepo::create(&pool, t.id, &family("MEAT", None, Some(z.id)))
        .await
        .unwrap();
    assert_eq!(f.preparation_zone_name.as_deref(), Some("Grill"));

    let z = PreparationZoneRepo::find_by_id(&pool, t.id, z.id).await.unwrap().unwrap();
    assert_eq!(z.family_count, 1);

    let by_zone = FamilyFilter {
        parent_id: None,
        preparation_zone_id: Some(z.id),
    };
    let page = ProductFamilyRepo::list(&pool, t.id, &ListFilter::default(), &by_zone, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn deleting_zone_detaches_families() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let z = PreparationZoneRepo::create(&pool, t.id, &zone("GRL", "Grill", 0)).await.unwrap();
    let f = ProductFamilyRepo::create(&pool, t.id, &family("MEAT", None, Some(z.id)))
        .await
        .unwrap();

    PreparationZoneRepo::soft_delete(&pool, t.id, z.id).await.unwrap();
    let f = ProductFamilyRepo::find_by_id(&pool, t.id, f.id).await.unwrap().unwrap();
    assert_eq!(f.preparation_zone_id, None);
}

#[tokio::test]
async fn ancestor_chain_walks_to_root() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let root = ProductFamilyRepo::create(&pool, t.id, &family("FOOD", None, None)).await.unwrap();
    let mid = ProductFamilyRepo::create(&pool, t.id, &family("MEAT", Some(root.id), None)).await.unwrap();
    let leaf = ProductFamilyRepo::create(&pool, t.id, &family("BEEF", Some(mid.id), None)).await.unwrap();

    let mut chain = ProductFamilyRepo::ancestor_ids(&pool, t.id, leaf.id).await.unwrap();
    chain.sort();
    assert_eq!(chain, vec![root.id, mid.id, leaf.id]);

    // Making the root a child of the leaf would close a loop.
    assert!(chain.contains(&root.id));
}

#[tokio::test]
async fn deleting_family_orphans_children() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let root = ProductFamilyRepo::create(&pool, t.id, &family("FOOD", None, None)).await.unwrap();
    let child = ProductFamilyRepo::create(&pool, t.id, &family("MEAT", Some(root.id), None)).await.unwrap();
    assert_eq!(child.parent_name.as_deref(), Some("Family FOOD"));

    ProductFamilyRepo::soft_delete(&pool, t.id, root.id).await.unwrap();
    let child = ProductFamilyRepo::find_by_id(&pool, t.id, child.id).await.unwrap().unwrap();
    assert_eq!(child.parent_id, None);
}

// ---------------------------------------------------------------------------
// Suppliers and payment methods
// ---------------------------------------------------------------------------

#[tokio::test]
async fn supplier_tax_id_is_unique_only_when_present() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    SupplierRepo::create(&pool, t.id, &supplier("S1", None, None)).await.unwrap();
    SupplierRepo::create(&pool, t.id, &supplier("S2", None, None)).await.unwrap();
    SupplierRepo::create(&pool, t.id, &supplier("S3", Some("B12345678"), None)).await.unwrap();

    let err = SupplierRepo::create(&pool, t.id, &supplier("S4", Some("B12345678"), None))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation());
}

#[tokio::test]
async fn payment_method_referenced_by_supplier() {
    let pool = common::pool().await;
    let t = common::tenant(&pool, "acme").await;

    let method = PaymentMethodRepo::create(
        &pool,
        t.id,
        &CreatePaymentMethod {
            code: "30D".to_string(),
            name: "30 days".to_string(),
            kind: "transfer".to_string(),
            installments: None,
            first_due_days: Some(30),
            days_between: None,
            surcharge_percent: None,
            is_active: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(method.installments, 1);
    assert!(!PaymentMethodRepo::is_referenced(&pool, t.id, method.id).await.unwrap());

    let s = SupplierRepo::create(&pool, t.id, &supplier("S1", None, Some(method.id)))
        .await
        .unwrap();
    assert_eq!(s.payment_method_name.as_deref(), Some("30 days"));
    assert!(PaymentMethodRepo::is_referenced(&pool, t.id, method.id).await.unwrap());

    SupplierRepo::soft_delete(&pool, t.id, s.id).await.unwrap();
    assert!(!PaymentMethodRepo::is_referenced(&pool, t.id, method.id).await.unwrap());
}
