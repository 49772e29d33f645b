//! HTTP-level tests for the master data resources: preparation zones,
//! product families, shifts, payment methods, suppliers and stock.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestUser};
use serde_json::json;

// ---------------------------------------------------------------------------
// Preparation zones
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zone_crud_round() {
    let ctx = TestUser::admin().await;
    let zone = ctx
        .create_ok(
            "/api/v1/preparation-zones",
            json!({"code": "GRILL", "name": "Grill", "color": "#FF8800", "sort_order": 2}),
        )
        .await;
    let id = zone["id"].as_i64().unwrap();
    assert_eq!(zone["family_count"], 0);
    assert_eq!(zone["is_active"], true);

    let response = ctx
        .put(
            &format!("/api/v1/preparation-zones/{id}"),
            json!({"name": "Charcoal grill"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Charcoal grill");
    assert_eq!(json["data"]["code"], "GRILL");

    let response = ctx.delete(&format!("/api/v1/preparation-zones/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = ctx.get(&format!("/api/v1/preparation-zones/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_zone_name_is_rejected() {
    let ctx = TestUser::admin().await;
    ctx.create_ok(
        "/api/v1/preparation-zones",
        json!({"code": "BAR", "name": "Bar"}),
    )
    .await;

    let response = ctx
        .post(
            "/api/v1/preparation-zones",
            json!({"code": "BAR2", "name": "Bar"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE");
}

#[tokio::test]
async fn deleting_missing_zone_is_not_found() {
    let ctx = TestUser::admin().await;
    let response = ctx.delete("/api/v1/preparation-zones/4242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_zone_color_is_rejected() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/preparation-zones",
            json!({"code": "K", "name": "Kitchen", "color": "orange"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn zone_list_paginates_and_searches() {
    let ctx = TestUser::admin().await;
    for i in 1..=5 {
        ctx.create_ok(
            "/api/v1/preparation-zones",
            json!({"code": format!("Z{i}"), "name": format!("Zone {i}")}),
        )
        .await;
    }

    let response = ctx.get("/api/v1/preparation-zones?page=2&limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 5);
    assert_eq!(json["pagination"]["page"], 2);
    assert_eq!(json["pagination"]["limit"], 2);
    assert_eq!(json["pagination"]["total_pages"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = ctx.get("/api/v1/preparation-zones?search=zone%203").await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["code"], "Z3");

    // A literal `%` matches nothing rather than everything.
    let response = ctx.get("/api/v1/preparation-zones?search=%25").await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 0);
    assert_eq!(json["pagination"]["total_pages"], 0);
}

// ---------------------------------------------------------------------------
// Product families
// ---------------------------------------------------------------------------

#[tokio::test]
async fn family_parent_cycles_are_rejected() {
    let ctx = TestUser::admin().await;
    let root = ctx
        .create_ok(
            "/api/v1/product-families",
            json!({"code": "DRINKS", "name": "Drinks"}),
        )
        .await;
    let root_id = root["id"].as_i64().unwrap();
    let child = ctx
        .create_ok(
            "/api/v1/product-families",
            json!({"code": "SODA", "name": "Soda", "parent_id": root_id}),
        )
        .await;
    let child_id = child["id"].as_i64().unwrap();

    // Root under its own child.
    let response = ctx
        .put(
            &format!("/api/v1/product-families/{root_id}"),
            json!({"parent_id": child_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Itself as parent.
    let response = ctx
        .put(
            &format!("/api/v1/product-families/{root_id}"),
            json!({"parent_id": root_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Listing by parent finds the child.
    let response = ctx
        .get(&format!("/api/v1/product-families?parent_id={root_id}"))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["code"], "SODA");
}

#[tokio::test]
async fn family_references_must_exist() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/product-families",
            json!({"code": "X", "name": "X", "preparation_zone_id": 999}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let zone = ctx
        .create_ok(
            "/api/v1/preparation-zones",
            json!({"code": "COLD", "name": "Cold"}),
        )
        .await;
    let family = ctx
        .create_ok(
            "/api/v1/product-families",
            json!({"code": "X", "name": "X", "preparation_zone_id": zone["id"]}),
        )
        .await;
    assert_eq!(family["preparation_zone_name"], "Cold");
}

// ---------------------------------------------------------------------------
// Shifts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overnight_shift_is_current_after_midnight() {
    let ctx = TestUser::admin().await;
    let night = ctx
        .create_ok(
            "/api/v1/shifts",
            json!({"code": "NIGHT", "name": "Night", "start_time": "22:00", "end_time": "06:00"}),
        )
        .await;
    assert_eq!(night["duration_minutes"], 480);
    assert_eq!(night["overnight"], true);
    ctx.create_ok(
        "/api/v1/shifts",
        json!({"code": "DAY", "name": "Day", "start_time": "08:00", "end_time": "16:00"}),
    )
    .await;

    let response = ctx.get("/api/v1/shifts/current?at=02:30").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["NIGHT"]);

    // End is exclusive.
    let response = ctx.get("/api/v1/shifts/current?at=16:00").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn shift_with_equal_bounds_is_rejected() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/shifts",
            json!({"code": "S", "name": "Same", "start_time": "08:00", "end_time": "08:00"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Payment methods and suppliers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payment_schedule_splits_amount() {
    let ctx = TestUser::admin().await;
    let method = ctx
        .create_ok(
            "/api/v1/payment-methods",
            json!({
                "code": "R306090",
                "name": "30/60/90",
                "kind": "transfer",
                "installments": 3,
                "first_due_days": 30,
                "days_between": 30
            }),
        )
        .await;
    let id = method["id"].as_i64().unwrap();

    let response = ctx
        .get(&format!(
            "/api/v1/payment-methods/{id}/schedule?amount=100&date=2026-01-01"
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let schedule = json["data"].as_array().unwrap();
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule[0]["due_date"], "2026-01-31");
    assert_eq!(schedule[0]["amount"], 33.33);
    assert_eq!(schedule[2]["due_date"], "2026-04-01");
    assert_eq!(schedule[2]["amount"], 33.34);
}

#[tokio::test]
async fn payment_method_terms_are_validated() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/payment-methods",
            json!({"code": "BAD", "name": "Bad", "kind": "transfer", "installments": 2}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .post(
            "/api/v1/payment-methods",
            json!({"code": "BAD", "name": "Bad", "kind": "barter"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn referenced_payment_method_cannot_be_deleted() {
    let ctx = TestUser::admin().await;
    let method = ctx
        .create_ok(
            "/api/v1/payment-methods",
            json!({"code": "CASH", "name": "Cash", "kind": "cash"}),
        )
        .await;
    let method_id = method["id"].as_i64().unwrap();
    let supplier = ctx
        .create_ok(
            "/api/v1/suppliers",
            json!({"code": "SUP1", "name": "Supplies Inc", "payment_method_id": method_id}),
        )
        .await;
    assert_eq!(supplier["payment_method_name"], "Cash");

    let response = ctx
        .delete(&format!("/api/v1/payment-methods/{method_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let supplier_id = supplier["id"].as_i64().unwrap();
    let response = ctx.delete(&format!("/api/v1/suppliers/{supplier_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = ctx
        .delete(&format!("/api/v1/payment-methods/{method_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn supplier_with_unknown_payment_method_is_rejected() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/suppliers",
            json!({"code": "SUP1", "name": "Supplies Inc", "payment_method_id": 77}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Stock
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stock_levels_follow_transfers() {
    let ctx = TestUser::admin().await;
    ctx.create_ok(
        "/api/v1/stock-movements",
        json!({"product_code": "FLOUR", "warehouse": "MAIN", "kind": "in",
               "quantity": 10.0, "movement_date": "2026-03-01"}),
    )
    .await;
    ctx.create_ok(
        "/api/v1/stock-movements",
        json!({"product_code": "FLOUR", "warehouse": "MAIN", "kind": "transfer",
               "destination_warehouse": "SHOP", "quantity": 4.0, "movement_date": "2026-03-02"}),
    )
    .await;

    let response = ctx
        .get("/api/v1/stock-movements/levels?product_code=FLOUR")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let levels = json["data"].as_array().unwrap();
    let qty = |wh: &str| {
        levels
            .iter()
            .find(|l| l["warehouse"] == wh)
            .map(|l| l["quantity"].as_f64().unwrap())
    };
    assert_eq!(qty("MAIN"), Some(6.0));
    assert_eq!(qty("SHOP"), Some(4.0));
}

#[tokio::test]
async fn transfer_without_destination_is_rejected() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/stock-movements",
            json!({"product_code": "FLOUR", "warehouse": "MAIN", "kind": "transfer",
                   "quantity": 1.0, "movement_date": "2026-03-01"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
