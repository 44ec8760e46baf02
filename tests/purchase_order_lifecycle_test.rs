mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

/// Monetary fields come back as JSON strings from Postgres and as numbers
/// from the SQLite test backend; parse either into a Decimal.
fn decimal_field(value: &Value, key: &str) -> Decimal {
    match &value[key] {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("field '{}' is not a decimal: {:?}", key, other),
    }
}

fn create_po_body(supplier_id: &str) -> Value {
    json!({
        "supplier_id": supplier_id,
        "items": [
            { "description": "Materials", "is_heading": true },
            { "description": "Widget", "quantity": 2, "unit_price": "10.00" },
            { "description": "Gasket", "quantity": 1, "unit_price": "5.00" }
        ]
    })
}

async fn create_po(app: &TestApp, supplier_id: &str) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(create_po_body(supplier_id)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

async fn set_status(app: &TestApp, id: &str, status: &str) -> axum::response::Response {
    app.request(
        Method::PUT,
        &format!("/api/v1/purchase-orders/{}", id),
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn create_applies_gst_and_excludes_headings() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;

    let created = create_po(&app, &supplier.id.to_string()).await;

    assert_eq!(created["status"], "draft");
    assert_eq!(created["po_number"], "PO-000001");
    assert_eq!(decimal_field(&created, "subtotal"), dec!(25.00));
    assert_eq!(decimal_field(&created, "tax_amount"), dec!(2.50));
    assert_eq!(decimal_field(&created, "total_amount"), dec!(27.50));

    // The heading row is persisted but contributes nothing.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/{}", created["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = response_json(response).await;

    let line_items = detail["line_items"].as_array().expect("line items array");
    assert_eq!(line_items.len(), 3);
    let heading = line_items
        .iter()
        .find(|item| item["is_heading"] == json!(true))
        .expect("heading row persisted");
    assert_eq!(decimal_field(heading, "line_total"), Decimal::ZERO);
}

#[tokio::test]
async fn unregistered_supplier_gets_no_tax() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Cash Only Co", false).await;

    let created = create_po(&app, &supplier.id.to_string()).await;

    assert_eq!(decimal_field(&created, "subtotal"), dec!(25.00));
    assert_eq!(decimal_field(&created, "tax_amount"), Decimal::ZERO);
    assert_eq!(decimal_field(&created, "total_amount"), dec!(25.00));
}

#[tokio::test]
async fn po_numbers_are_sequential() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let supplier_id = supplier.id.to_string();

    let first = create_po(&app, &supplier_id).await;
    let second = create_po(&app, &supplier_id).await;

    assert_eq!(first["po_number"], "PO-000001");
    assert_eq!(second["po_number"], "PO-000002");
}

#[tokio::test]
async fn forward_transitions_are_allowed_and_backwards_rejected() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let response = set_status(&app, id, "pending").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = set_status(&app, id, "approved").await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["status"], "approved");

    // Approved orders cannot go back to pending.
    let response = set_status(&app, id, "pending").await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Cannot transition"));
}

#[tokio::test]
async fn skipping_a_stage_is_rejected() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    // draft -> approved skips pending.
    let response = set_status(&app, id, "approved").await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn legacy_statuses_are_rejected() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    for legacy in ["sent", "received", "completed"] {
        let response = set_status(&app, id, legacy).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "status {legacy}");
        let body = response_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("deprecated"));
    }
}

#[tokio::test]
async fn only_drafts_can_be_deleted() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    set_status(&app, id, "pending").await;

    let response = app
        .request(Method::DELETE, &format!("/api/v1/purchase-orders/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        "Only draft purchase orders can be deleted. Use void instead for non-draft orders."
    );
}

#[tokio::test]
async fn draft_deletion_removes_the_order() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/api/v1/purchase-orders/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::GET, &format!("/api/v1/purchase-orders/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn voiding_retires_in_flight_orders() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    set_status(&app, id, "pending").await;
    set_status(&app, id, "approved").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/void", id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let voided = response_json(response).await;
    assert_eq!(voided["status"], "voided");

    // A voided order stays voided.
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/void", id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn drafts_cannot_be_voided() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/void", id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("deleted"));
}

#[tokio::test]
async fn line_items_lock_after_approval() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    set_status(&app, id, "pending").await;
    set_status(&app, id, "approved").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", id),
            Some(json!({
                "line_items": [
                    { "description": "Sneaky addition", "quantity": 1, "unit_price": "1.00" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn replacing_line_items_recomputes_totals() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let created = create_po(&app, &supplier.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", id),
            Some(json!({
                "line_items": [
                    { "description": "Bolt", "quantity": 3, "unit_price": "9.99" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;

    assert_eq!(decimal_field(&updated, "subtotal"), dec!(29.97));
    assert_eq!(decimal_field(&updated, "tax_amount"), dec!(3.00));
    assert_eq!(decimal_field(&updated, "total_amount"), dec!(32.97));
}

#[tokio::test]
async fn filtering_by_status_and_supplier() {
    let app = TestApp::new().await;
    let supplier_a = app.seed_supplier("Alpha Pty Ltd", true).await;
    let supplier_b = app.seed_supplier("Beta Pty Ltd", false).await;

    let first = create_po(&app, &supplier_a.id.to_string()).await;
    create_po(&app, &supplier_b.id.to_string()).await;
    set_status(&app, first["id"].as_str().unwrap(), "pending").await;

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders/status/pending", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let pending = response_json(response).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/supplier/{}", supplier_b.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let by_supplier = response_json(response).await;
    assert_eq!(by_supplier.as_array().unwrap().len(), 1);

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders/status/bogus", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_paginated() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;
    let supplier_id = supplier.id.to_string();

    for _ in 0..3 {
        create_po(&app, &supplier_id).await;
    }

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders?page=1&per_page=2", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn creation_requires_line_items_and_a_known_supplier() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({ "supplier_id": supplier.id, "items": [] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(create_po_body(&uuid::Uuid::new_v4().to_string())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn terminal_orders_reject_modification() {
    let app = TestApp::new().await;
    let registered = app.seed_supplier("Registered Pty Ltd", true).await;
    let unregistered = app.seed_supplier("Cash Only Co", false).await;
    let created = create_po(&app, &registered.id.to_string()).await;
    let id = created["id"].as_str().unwrap();

    set_status(&app, id, "pending").await;
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/void", id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Swapping the supplier would recompute tax from the new supplier's
    // GST registration and rewrite a closed order's totals.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", id),
            Some(json!({ "supplier_id": unregistered.id })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("can no longer be modified"));

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", id),
            Some(json!({ "notes": "late annotation" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

    // A status no-op is the one accepted update on a terminal order.
    let response = set_status(&app, id, "voided").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, &format!("/api/v1/purchase-orders/{}", id), None)
        .await;
    let detail = response_json(response).await;
    assert_eq!(detail["supplier_id"], json!(registered.id));
    assert_eq!(decimal_field(&detail, "tax_amount"), dec!(2.50));
    assert_eq!(decimal_field(&detail, "total_amount"), dec!(27.50));
}

#[tokio::test]
async fn po_numbers_grow_past_six_digits() {
    use chrono::Utc;
    use procurement_api::models::{purchase_order, PurchaseOrderStatus};
    use sea_orm::{ActiveModelTrait, Set};

    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Registered Pty Ltd", true).await;

    // Seed an order at the top of the six-digit range; the next allocation
    // must roll over to seven digits, not restart below it.
    let now = Utc::now();
    purchase_order::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        po_number: Set("PO-999999".to_string()),
        supplier_id: Set(supplier.id),
        status: Set(PurchaseOrderStatus::Draft),
        subtotal: Set(Decimal::ZERO),
        tax_amount: Set(Decimal::ZERO),
        total_amount: Set(Decimal::ZERO),
        currency: Set("AUD".to_string()),
        order_date: Set(None),
        delivery_date: Set(None),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(app.state.db.as_ref())
    .await
    .expect("seed high-numbered purchase order");

    let first = create_po(&app, &supplier.id.to_string()).await;
    let second = create_po(&app, &supplier.id.to_string()).await;

    assert_eq!(first["po_number"], "PO-1000000");
    assert_eq!(second["po_number"], "PO-1000001");
}
