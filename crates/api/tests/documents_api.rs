//! HTTP-level tests for work orders, invoices, planning, bank
//! reconciliation, price lists and grid preferences.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestUser};
use serde_json::{json, Value};

fn line(description: &str, quantity: f64, unit_price: f64) -> Value {
    json!({
        "description": description,
        "quantity": quantity,
        "unit_price": unit_price,
        "tax_rate": 21.0
    })
}

async fn completed_order(ctx: &TestUser) -> i64 {
    let order = ctx
        .create_ok(
            "/api/v1/work-orders",
            json!({
                "customer_name": "Bistro Luna",
                "scheduled_date": "2026-03-02",
                "lines": [line("Oven repair", 2.0, 50.0)]
            }),
        )
        .await;
    let id = order["id"].as_i64().unwrap();
    for status in ["in_progress", "completed"] {
        let response = ctx
            .post(
                &format!("/api/v1/work-orders/{id}/status"),
                json!({"status": status, "completed_date": "2026-03-05"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    id
}

async fn draft_invoice(ctx: &TestUser, lines: Vec<Value>) -> Value {
    ctx.create_ok(
        "/api/v1/invoices",
        json!({
            "issue_date": "2026-03-10",
            "customer_name": "Bistro Luna",
            "lines": lines
        }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Work orders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn work_order_gets_number_and_totals() {
    let ctx = TestUser::admin().await;
    let first = ctx
        .create_ok(
            "/api/v1/work-orders",
            json!({"customer_name": "A", "lines": [line("Service", 2.0, 50.0)]}),
        )
        .await;
    assert_eq!(first["number"], "PT-000001");
    assert_eq!(first["status"], "pending");
    assert_eq!(first["totals"]["subtotal"], 100.0);
    assert_eq!(first["totals"]["tax_total"], 21.0);
    assert_eq!(first["totals"]["total"], 121.0);
    assert_eq!(first["lines"].as_array().unwrap().len(), 1);

    let second = ctx
        .create_ok("/api/v1/work-orders", json!({"customer_name": "B"}))
        .await;
    assert_eq!(second["number"], "PT-000002");
}

#[tokio::test]
async fn work_order_status_transitions_are_enforced() {
    let ctx = TestUser::admin().await;
    let order = ctx
        .create_ok("/api/v1/work-orders", json!({"customer_name": "A"}))
        .await;
    let id = order["id"].as_i64().unwrap();

    // pending cannot jump to completed.
    let response = ctx
        .post(
            &format!("/api/v1/work-orders/{id}/status"),
            json!({"status": "completed"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // invoiced is only reachable through the invoice endpoint.
    let response = ctx
        .post(
            &format!("/api/v1/work-orders/{id}/status"),
            json!({"status": "invoiced"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .post(
            &format!("/api/v1/work-orders/{id}/status"),
            json!({"status": "on_hold"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invoicing_a_completed_order_creates_a_draft() {
    let ctx = TestUser::admin().await;
    let method = ctx
        .create_ok(
            "/api/v1/payment-methods",
            json!({"code": "T30", "name": "30 days", "kind": "transfer", "first_due_days": 30}),
        )
        .await;
    let order_id = completed_order(&ctx).await;

    let response = ctx
        .post(
            &format!("/api/v1/work-orders/{order_id}/invoice"),
            json!({"issue_date": "2026-03-10", "payment_method_id": method["id"]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invoice = body_json(response).await["data"].clone();
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["series"], "A");
    assert_eq!(invoice["due_date"], "2026-04-09");
    assert_eq!(invoice["work_order_id"], order_id);
    assert_eq!(invoice["total"], 121.0);
    assert_eq!(invoice["lines"].as_array().unwrap().len(), 1);

    let response = ctx.get(&format!("/api/v1/work-orders/{order_id}")).await;
    let order = body_json(response).await;
    assert_eq!(order["data"]["status"], "invoiced");

    // A second conversion and any further edit are refused.
    let response = ctx
        .post(&format!("/api/v1/work-orders/{order_id}/invoice"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = ctx
        .put(
            &format!("/api/v1/work-orders/{order_id}"),
            json!({"customer_name": "Other"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn pending_order_cannot_be_invoiced() {
    let ctx = TestUser::admin().await;
    let order = ctx
        .create_ok("/api/v1/work-orders", json!({"customer_name": "A"}))
        .await;
    let id = order["id"].as_i64().unwrap();
    let response = ctx
        .post(&format!("/api/v1/work-orders/{id}/invoice"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_pending_or_cancelled_orders_are_deleted() {
    let ctx = TestUser::admin().await;
    let order_id = completed_order(&ctx).await;
    let response = ctx.delete(&format!("/api/v1/work-orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .post(
            &format!("/api/v1/work-orders/{order_id}/status"),
            json!({"status": "cancelled"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = ctx.delete(&format!("/api/v1/work-orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn planning_returns_one_bucket_per_day() {
    let ctx = TestUser::admin().await;
    ctx.create_ok(
        "/api/v1/work-orders",
        json!({"customer_name": "Scheduled", "scheduled_date": "2026-05-04"}),
    )
    .await;
    ctx.create_ok(
        "/api/v1/work-orders",
        json!({"customer_name": "Due only", "due_date": "2026-05-06"}),
    )
    .await;
    ctx.create_ok(
        "/api/v1/work-orders",
        json!({"customer_name": "Out of range", "scheduled_date": "2026-06-01"}),
    )
    .await;

    let response = ctx.get("/api/v1/planning?from=2026-05-01&to=2026-05-07").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let buckets = json["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[0]["date"], "2026-05-01");
    assert_eq!(buckets[3]["items"][0]["customer_name"], "Scheduled");
    assert_eq!(buckets[5]["items"][0]["customer_name"], "Due only");
    let placed: usize = buckets
        .iter()
        .map(|b| b["items"].as_array().unwrap().len())
        .sum();
    assert_eq!(placed, 2);
}

#[tokio::test]
async fn planning_rejects_reversed_range() {
    let ctx = TestUser::admin().await;
    let response = ctx.get("/api/v1/planning?from=2026-05-07&to=2026-05-01").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issuing_assigns_code_and_freezes_the_invoice() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(&ctx, vec![line("Service", 1.0, 100.0)]).await;
    let id = invoice["id"].as_i64().unwrap();
    assert!(invoice["code"].is_null());

    let response = ctx
        .post(&format!("/api/v1/invoices/{id}/issue"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "issued");
    assert_eq!(json["data"]["code"], "A-2026-00001");

    let response = ctx
        .put(
            &format!("/api/v1/invoices/{id}"),
            json!({"customer_name": "Someone else"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = ctx.delete(&format!("/api/v1/invoices/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The next issued invoice of the series takes the following number.
    let second = draft_invoice(&ctx, vec![line("Service", 1.0, 10.0)]).await;
    let second_id = second["id"].as_i64().unwrap();
    let response = ctx
        .post(&format!("/api/v1/invoices/{second_id}/issue"), json!({}))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["code"], "A-2026-00002");
}

#[tokio::test]
async fn invoice_without_lines_cannot_be_issued() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(&ctx, vec![]).await;
    let id = invoice["id"].as_i64().unwrap();
    let response = ctx
        .post(&format!("/api/v1/invoices/{id}/issue"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lines_can_be_duplicated_and_moved() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(
        &ctx,
        vec![line("First", 1.0, 10.0), line("Second", 1.0, 20.0)],
    )
    .await;
    let id = invoice["id"].as_i64().unwrap();

    let response = ctx
        .post(&format!("/api/v1/invoices/{id}/lines/1/duplicate"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let descriptions: Vec<&str> = json["data"]["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["First", "First", "Second"]);
    assert_eq!(json["data"]["subtotal"], 40.0);

    let response = ctx
        .post(
            &format!("/api/v1/invoices/{id}/lines/move"),
            json!({"from": 3, "to": 1}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let lines = json["data"]["lines"].as_array().unwrap();
    assert_eq!(lines[0]["description"], "Second");
    assert_eq!(lines[0]["position"], 1);
    assert_eq!(lines[2]["position"], 3);

    let response = ctx
        .post(&format!("/api/v1/invoices/{id}/lines/9/duplicate"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn due_dates_follow_the_payment_method() {
    let ctx = TestUser::admin().await;
    let method = ctx
        .create_ok(
            "/api/v1/payment-methods",
            json!({"code": "R3060", "name": "30/60", "kind": "transfer",
                   "installments": 2, "first_due_days": 30, "days_between": 30}),
        )
        .await;
    let invoice = ctx
        .create_ok(
            "/api/v1/invoices",
            json!({
                "issue_date": "2026-03-10",
                "customer_name": "Bistro Luna",
                "payment_method_id": method["id"],
                "lines": [line("Service", 1.0, 100.0)]
            }),
        )
        .await;
    let id = invoice["id"].as_i64().unwrap();
    assert_eq!(invoice["due_date"], "2026-05-09");

    let response = ctx.get(&format!("/api/v1/invoices/{id}/due-dates")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let schedule = json["data"].as_array().unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0]["due_date"], "2026-04-09");
    assert_eq!(schedule[0]["amount"], 60.5);
    assert_eq!(schedule[1]["due_date"], "2026-05-09");
    assert_eq!(schedule[1]["amount"], 60.5);
}

#[tokio::test]
async fn refund_invoice_falls_due_as_a_negative_amount() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(&ctx, vec![line("Returned part", -1.0, 10.0)]).await;
    let id = invoice["id"].as_i64().unwrap();
    assert_eq!(invoice["total"], -12.1);

    let response = ctx.get(&format!("/api/v1/invoices/{id}/due-dates")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let schedule = json["data"].as_array().unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0]["due_date"], "2026-03-10");
    assert_eq!(schedule[0]["amount"], -12.1);
}

#[tokio::test]
async fn invoice_rejects_unknown_payment_method() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .post(
            "/api/v1/invoices",
            json!({"issue_date": "2026-03-10", "customer_name": "X", "payment_method_id": 55}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Bank reconciliation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reconciling_full_amount_pays_the_invoice() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(&ctx, vec![line("Service", 1.0, 100.0)]).await;
    let invoice_id = invoice["id"].as_i64().unwrap();

    let movement = ctx
        .create_ok(
            "/api/v1/bank-movements",
            json!({"account": "ES00 MAIN", "movement_date": "2026-03-20",
                   "concept": "Transfer Bistro Luna", "amount": 121.0}),
        )
        .await;
    let movement_id = movement["id"].as_i64().unwrap();

    // Drafts do not accept payments.
    let response = ctx
        .post(
            &format!("/api/v1/bank-movements/{movement_id}/reconcile"),
            json!({"invoice_id": invoice_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .post(&format!("/api/v1/invoices/{invoice_id}/issue"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .post(
            &format!("/api/v1/bank-movements/{movement_id}/reconcile"),
            json!({"invoice_id": invoice_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["invoice_paid"], true);
    assert_eq!(json["data"]["paid_amount"], 121.0);
    assert_eq!(json["data"]["movement"]["reconciled"], true);

    let response = ctx.get(&format!("/api/v1/invoices/{invoice_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "paid");

    let response = ctx
        .post(
            &format!("/api/v1/bank-movements/{movement_id}/reconcile"),
            json!({"invoice_id": invoice_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reconciled_movement_cannot_be_deleted() {
    let ctx = TestUser::admin().await;
    let invoice = draft_invoice(&ctx, vec![line("Service", 1.0, 100.0)]).await;
    let invoice_id = invoice["id"].as_i64().unwrap();
    let response = ctx
        .post(&format!("/api/v1/invoices/{invoice_id}/issue"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let movement = ctx
        .create_ok(
            "/api/v1/bank-movements",
            json!({"account": "ES00 MAIN", "movement_date": "2026-03-20",
                   "concept": "Transfer Bistro Luna", "amount": 121.0}),
        )
        .await;
    let movement_id = movement["id"].as_i64().unwrap();
    let response = ctx
        .post(
            &format!("/api/v1/bank-movements/{movement_id}/reconcile"),
            json!({"invoice_id": invoice_id}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .delete(&format!("/api/v1/bank-movements/{movement_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The payment is still recorded.
    let response = ctx.get(&format!("/api/v1/invoices/{invoice_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "paid");

    // Unreconciled movements can still be removed.
    let loose = ctx
        .create_ok(
            "/api/v1/bank-movements",
            json!({"account": "ES00 MAIN", "movement_date": "2026-03-21",
                   "concept": "Bank fee", "amount": -3.5}),
        )
        .await;
    let loose_id = loose["id"].as_i64().unwrap();
    let response = ctx.delete(&format!("/api/v1/bank-movements/{loose_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn movement_summary_splits_income_and_expense() {
    let ctx = TestUser::admin().await;
    for amount in [100.0, -30.0, 50.0] {
        ctx.create_ok(
            "/api/v1/bank-movements",
            json!({"account": "MAIN", "movement_date": "2026-03-01",
                   "concept": "Movement", "amount": amount}),
        )
        .await;
    }
    let response = ctx.get("/api/v1/bank-movements/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["income"], 150.0);
    assert_eq!(json["data"]["expense"], 30.0);
    assert_eq!(json["data"]["net"], 120.0);
    assert_eq!(json["data"]["count"], 3);
}

// ---------------------------------------------------------------------------
// Sales agent commissions
// ---------------------------------------------------------------------------

async fn agent_invoice(ctx: &TestUser, agent_id: i64, issue_date: &str, unit_price: f64) -> i64 {
    let invoice = ctx
        .create_ok(
            "/api/v1/invoices",
            json!({
                "issue_date": issue_date,
                "customer_name": "Bistro Luna",
                "sales_agent_id": agent_id,
                "lines": [line("Service", 1.0, unit_price)]
            }),
        )
        .await;
    invoice["id"].as_i64().unwrap()
}

async fn issue(ctx: &TestUser, invoice_id: i64) {
    let response = ctx
        .post(&format!("/api/v1/invoices/{invoice_id}/issue"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn commissions_cover_billed_invoices_in_range() {
    let ctx = TestUser::admin().await;
    let agent = ctx
        .create_ok(
            "/api/v1/sales-agents",
            json!({"code": "AG1", "name": "Marta", "commission_percent": 12.5}),
        )
        .await;
    let agent_id = agent["id"].as_i64().unwrap();

    let issued = agent_invoice(&ctx, agent_id, "2026-03-10", 100.0).await;
    issue(&ctx, issued).await;

    // 33.33 * 12.5% = 4.16625, rounded to 4.17.
    let paid = agent_invoice(&ctx, agent_id, "2026-03-12", 33.33).await;
    issue(&ctx, paid).await;
    let movement = ctx
        .create_ok(
            "/api/v1/bank-movements",
            json!({"account": "ES00 MAIN", "movement_date": "2026-03-20",
                   "concept": "Transfer Bistro Luna", "amount": 40.33}),
        )
        .await;
    let response = ctx
        .post(
            &format!("/api/v1/bank-movements/{}/reconcile", movement["id"]),
            json!({"invoice_id": paid}),
        )
        .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["invoice_paid"], true);

    // Drafts, cancelled invoices and invoices outside the range do not count.
    agent_invoice(&ctx, agent_id, "2026-03-11", 500.0).await;
    let cancelled = agent_invoice(&ctx, agent_id, "2026-03-15", 80.0).await;
    issue(&ctx, cancelled).await;
    let response = ctx
        .post(&format!("/api/v1/invoices/{cancelled}/cancel"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let april = agent_invoice(&ctx, agent_id, "2026-04-05", 200.0).await;
    issue(&ctx, april).await;

    let response = ctx
        .get(&format!(
            "/api/v1/sales-agents/{agent_id}/commissions?from=2026-03-01&to=2026-03-31"
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();
    assert_eq!(report["commission_percent"], 12.5);
    let invoices = report["invoices"].as_array().unwrap();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0]["invoice_id"], issued);
    assert_eq!(invoices[0]["status"], "issued");
    assert_eq!(invoices[0]["commission"], 12.5);
    assert_eq!(invoices[1]["invoice_id"], paid);
    assert_eq!(invoices[1]["status"], "paid");
    assert_eq!(invoices[1]["commission"], 4.17);
    assert_eq!(report["billed_subtotal"], 133.33);
    assert_eq!(report["commission_total"], 16.67);

    // Without a range the April invoice is included too.
    let response = ctx
        .get(&format!("/api/v1/sales-agents/{agent_id}/commissions"))
        .await;
    let report = body_json(response).await["data"].clone();
    assert_eq!(report["invoices"].as_array().unwrap().len(), 3);
    assert_eq!(report["commission_total"], 41.67);
}

#[tokio::test]
async fn commissions_reject_reversed_range_and_unknown_agent() {
    let ctx = TestUser::admin().await;
    let agent = ctx
        .create_ok("/api/v1/sales-agents", json!({"code": "AG1", "name": "Marta"}))
        .await;
    let response = ctx
        .get(&format!(
            "/api/v1/sales-agents/{}/commissions?from=2026-03-31&to=2026-03-01",
            agent["id"]
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx.get("/api/v1/sales-agents/999/commissions").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Price lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_prices_derive_from_margin_and_reprice() {
    let ctx = TestUser::admin().await;
    let list = ctx
        .create_ok(
            "/api/v1/price-lists",
            json!({"code": "RETAIL", "name": "Retail", "is_default": true}),
        )
        .await;
    let list_id = list["id"].as_i64().unwrap();

    let item = ctx
        .create_ok(
            &format!("/api/v1/price-lists/{list_id}/items"),
            json!({
                "product_code": "COFFEE",
                "product_name": "Coffee beans",
                "cost_price": 60.0,
                "tax_rate": 21.0,
                "price": {"driver": "margin", "value": 40.0}
            }),
        )
        .await;
    assert_eq!(item["sale_price"], 100.0);
    assert_eq!(item["retail_price"], 121.0);
    assert_eq!(item["margin_percent"], 40.0);

    let response = ctx
        .post(
            &format!("/api/v1/price-lists/{list_id}/reprice"),
            json!({"percent": 10.0}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 1);

    let item_id = item["id"].as_i64().unwrap();
    let response = ctx
        .get(&format!("/api/v1/price-lists/{list_id}/items/{item_id}"))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["sale_price"], 110.0);
    assert_eq!(json["data"]["retail_price"], 133.1);

    // A second default list takes the flag over.
    ctx.create_ok(
        "/api/v1/price-lists",
        json!({"code": "WHOLESALE", "name": "Wholesale", "is_default": true}),
    )
    .await;
    let response = ctx.get(&format!("/api/v1/price-lists/{list_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_default"], false);
    assert_eq!(json["data"]["item_count"], 1);
}

// ---------------------------------------------------------------------------
// Grid preferences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn grid_layout_save_load_and_reset() {
    let ctx = TestUser::admin().await;
    let uri = "/api/v1/preferences/grids/invoice.lines";

    let response = ctx.get(uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .put(
            uri,
            json!({"columns": [
                {"key": "description", "width": 240},
                {"key": "quantity", "visible": false}
            ]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.get(uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["grid_key"], "invoice.lines");
    assert_eq!(json["data"]["columns"][0]["width"], 240);
    assert_eq!(json["data"]["columns"][1]["visible"], false);

    // Layouts are per user.
    let colleague = ctx.colleague("clerk@acme.test").await;
    let response = colleague.get(uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.delete(uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = ctx.get(uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = ctx.delete(uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn grid_layout_rejects_duplicate_columns() {
    let ctx = TestUser::admin().await;
    let response = ctx
        .put(
            "/api/v1/preferences/grids/invoices",
            json!({"columns": [{"key": "code"}, {"key": "code"}]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
