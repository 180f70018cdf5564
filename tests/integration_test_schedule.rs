mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &TestApp, uri: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

async fn get(app: &TestApp, uri: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    ).await.unwrap()
}

async fn seed_unit(app: &TestApp, name: &str) -> String {
    let res = post_json(app, "/api/v1/units", json!({ "name": name })).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn seed_period(app: &TestApp, name: &str) -> String {
    let res = post_json(app, "/api/v1/periods", json!({
        "name": name, "starts_on": "2025-09-01", "ends_on": "2026-08-31"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let res = post_json(app, &format!("/api/v1/periods/{}/activate", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    id
}

async fn seed_plan(app: &TestApp, deposit_cents: i64, discount: f64) -> String {
    let res = post_json(app, "/api/v1/plans", json!({
        "name": "Three instalments",
        "number_of_installments": 3,
        "deposit_cents": deposit_cents,
        "discount_percentage": discount,
        "due_dates": ["2025-10-01", "2026-01-01", "2026-04-01"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_standard_three_installment_schedule() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio A").await;
    let period = seed_period(&app, "2025/2026").await;
    let plan = seed_plan(&app, 50_000, 0.0).await;

    let res = post_json(&app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period, "plan_id": plan,
        "name": "Alice", "email": "alice@example.com",
        "total_cents": 720_000
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let reservation = parse_body(res).await;
    assert_eq!(reservation["deposit_cents"], 50_000);

    let invoices = parse_body(get(&app, &format!(
        "/api/v1/reservations/{}/invoices", reservation["id"].as_str().unwrap()
    )).await).await;
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices.len(), 4);

    assert_eq!(invoices[0]["kind"], "DEPOSIT");
    assert_eq!(invoices[0]["amount_cents"], 50_000);

    // (720000 - 50000) / 3 leaves a 1-cent remainder on the last line.
    assert_eq!(invoices[1]["amount_cents"], 223_333);
    assert_eq!(invoices[2]["amount_cents"], 223_333);
    assert_eq!(invoices[3]["amount_cents"], 223_334);
    assert_eq!(invoices[1]["due_date"], "2025-10-01");
    assert_eq!(invoices[2]["due_date"], "2026-01-01");
    assert_eq!(invoices[3]["due_date"], "2026-04-01");
    assert_eq!(invoices[3]["sequence_number"], 3);

    let sum: i64 = invoices.iter().map(|i| i["amount_cents"].as_i64().unwrap()).sum();
    assert_eq!(sum, 720_000);
}

#[tokio::test]
async fn test_booking_without_plan_is_deposit_only() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio B").await;
    let period = seed_period(&app, "2025/2026").await;

    let res = post_json(&app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period,
        "name": "Bob", "total_cents": 720_000
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let reservation = parse_body(res).await;

    let invoices = parse_body(get(&app, &format!(
        "/api/v1/reservations/{}/invoices", reservation["id"].as_str().unwrap()
    )).await).await;
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["kind"], "DEPOSIT");
    assert_eq!(invoices[0]["amount_cents"], 50_000);
    assert!(invoices[0]["sequence_number"].is_null());
}

#[tokio::test]
async fn test_discount_applies_to_remainder_not_deposit() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio C").await;
    let period = seed_period(&app, "2025/2026").await;
    let plan = seed_plan(&app, 20_000, 10.0).await;

    let res = post_json(&app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period, "plan_id": plan,
        "name": "Carol", "total_cents": 120_000
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let reservation = parse_body(res).await;

    let invoices = parse_body(get(&app, &format!(
        "/api/v1/reservations/{}/invoices", reservation["id"].as_str().unwrap()
    )).await).await;
    let invoices = invoices.as_array().unwrap();

    // Deposit untouched; (120000 - 20000) * 0.9 = 90000 across three lines.
    assert_eq!(invoices[0]["amount_cents"], 20_000);
    assert_eq!(invoices[1]["amount_cents"], 30_000);
    assert_eq!(invoices[2]["amount_cents"], 30_000);
    assert_eq!(invoices[3]["amount_cents"], 30_000);
}

#[tokio::test]
async fn test_total_not_exceeding_deposit_is_invalid() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio D").await;
    let period = seed_period(&app, "2025/2026").await;
    let plan = seed_plan(&app, 50_000, 0.0).await;

    let res = post_json(&app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period, "plan_id": plan,
        "name": "Dan", "total_cents": 50_000
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse_body(res).await["code"], "INVALID_PLAN");

    // Fail fast: no reservation and no occupancy were written.
    let list = parse_body(get(&app, "/api/v1/reservations").await).await;
    assert!(list.as_array().unwrap().is_empty());
    let res = post_json(&app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period,
        "name": "Dan", "total_cents": 50_000
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_plan_with_mismatched_due_dates_rejected() {
    let app = TestApp::new().await;

    let res = post_json(&app, "/api/v1/plans", json!({
        "name": "Broken",
        "number_of_installments": 3,
        "deposit_cents": 50_000,
        "due_dates": ["2025-10-01", "2026-01-01"]
    })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse_body(res).await["code"], "INVALID_PLAN");
}

#[tokio::test]
async fn test_schedule_reconciles_for_awkward_totals() {
    let app = TestApp::new().await;
    let period = seed_period(&app, "2025/2026").await;
    let plan = seed_plan(&app, 30_000, 7.5).await;

    // Totals chosen so neither the discount nor the split lands evenly.
    for (idx, total) in [100_001_i64, 333_333, 555_557].iter().enumerate() {
        let unit = seed_unit(&app, &format!("Studio R{}", idx)).await;
        let res = post_json(&app, "/api/v1/bookings", json!({
            "unit_id": unit, "period_id": period, "plan_id": plan,
            "name": format!("Occupant {}", idx), "total_cents": total
        })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let reservation = parse_body(res).await;

        let invoices = parse_body(get(&app, &format!(
            "/api/v1/reservations/{}/invoices", reservation["id"].as_str().unwrap()
        )).await).await;
        let invoices = invoices.as_array().unwrap();
        assert_eq!(invoices.len(), 4);

        let discounted_remainder = ((total - 30_000) as f64 * 0.925).round() as i64;
        let sum: i64 = invoices.iter().map(|i| i["amount_cents"].as_i64().unwrap()).sum();
        assert_eq!(sum, 30_000 + discounted_remainder, "total {} did not reconcile", total);
    }
}
