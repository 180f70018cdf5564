mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use residence_backend::error::AppError;
use serde_json::{json, Value};
use tokio::task::JoinSet;
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

/// Books a unit on a 3-installment plan and returns (reservation_id,
/// deposit_invoice_id, installment_invoice_ids).
async fn seed_planned_booking(app: &TestApp, unit_name: &str) -> (String, String, Vec<String>) {
    let res = post_json(app, "/api/v1/units", json!({ "name": unit_name })).await;
    let unit = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = post_json(app, "/api/v1/periods", json!({
        "name": format!("{} period", unit_name), "starts_on": "2025-09-01", "ends_on": "2026-08-31"
    })).await;
    let period = parse_body(res).await["id"].as_str().unwrap().to_string();
    post_json(app, &format!("/api/v1/periods/{}/activate", period), json!({})).await;

    let res = post_json(app, "/api/v1/plans", json!({
        "name": "Quarterly", "number_of_installments": 3, "deposit_cents": 50_000,
        "late_fee_percentage": 2.0, "late_fee_flat_cents": 1_000,
        "due_dates": ["2025-10-01", "2026-01-01", "2026-04-01"]
    })).await;
    let plan = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = post_json(app, "/api/v1/bookings", json!({
        "unit_id": unit, "period_id": period, "plan_id": plan,
        "name": "Alice", "email": "alice@example.com", "total_cents": 720_000
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let reservation = parse_body(res).await["id"].as_str().unwrap().to_string();

    let invoices = parse_body(get(app, &format!("/api/v1/reservations/{}/invoices", reservation)).await).await;
    let invoices = invoices.as_array().unwrap();
    let deposit = invoices[0]["id"].as_str().unwrap().to_string();
    let installments = invoices[1..].iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    (reservation, deposit, installments)
}

async fn invoice_status(app: &TestApp, reservation: &str, invoice_id: &str) -> String {
    let invoices = parse_body(get(app, &format!("/api/v1/reservations/{}/invoices", reservation)).await).await;
    invoices.as_array().unwrap().iter()
        .find(|i| i["id"] == invoice_id)
        .map(|i| i["status"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_card_payment_completes_invoice_and_confirms_reservation() {
    let app = TestApp::new().await;
    let (reservation, deposit, _) = seed_planned_booking(&app, "Studio P1").await;

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "CARD", "external_reference": "ch_abc"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let payment = parse_body(res).await;
    assert_eq!(payment["status"], "COMPLETED");
    assert_eq!(payment["approval_status"], "APPROVED");

    assert_eq!(invoice_status(&app, &reservation, &deposit).await, "COMPLETED");

    // Settling the deposit is what firms up the booking.
    let body = parse_body(get(&app, &format!("/api/v1/reservations/{}", reservation)).await).await;
    assert_eq!(body["reservation"]["status"], "CONFIRMED");
}

#[tokio::test]
async fn test_offline_payment_requires_approval() {
    let app = TestApp::new().await;
    let (reservation, deposit, _) = seed_planned_booking(&app, "Studio P2").await;

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "BANK_TRANSFER", "external_reference": "tx-001"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let payment = parse_body(res).await;
    let payment_id = payment["id"].as_str().unwrap().to_string();
    assert_eq!(payment["status"], "PENDING");
    assert_eq!(payment["approval_status"], "PENDING");

    // Submission alone settles nothing.
    assert_eq!(invoice_status(&app, &reservation, &deposit).await, "PENDING");

    let pending = parse_body(get(&app, "/api/v1/payments/pending").await).await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["payment"]["id"], payment_id.as_str());
    assert_eq!(pending[0]["invoice"]["id"], deposit.as_str());

    let res = post_json(&app, &format!("/api/v1/payments/{}/approve", payment_id), json!({
        "approver_id": "operator-7"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "COMPLETED");

    let stored = app.state.payment_repo.find_by_id(&payment_id).await.unwrap().unwrap();
    assert_eq!(stored.approval_status, "APPROVED");
    assert_eq!(stored.approved_by.as_deref(), Some("operator-7"));

    let body = parse_body(get(&app, &format!("/api/v1/reservations/{}", reservation)).await).await;
    assert_eq!(body["reservation"]["status"], "CONFIRMED");
}

#[tokio::test]
async fn test_approve_is_single_use() {
    let app = TestApp::new().await;
    let (reservation, deposit, _) = seed_planned_booking(&app, "Studio P3").await;

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "CASH"
    })).await;
    let payment_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = post_json(&app, &format!("/api/v1/payments/{}/approve", payment_id), json!({
        "approver_id": "operator-1"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Double-click: the second approval must be rejected, not repeated.
    let res = post_json(&app, &format!("/api/v1/payments/{}/approve", payment_id), json!({
        "approver_id": "operator-2"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "ALREADY_PROCESSED");

    // State is unchanged by the losing click.
    let stored = app.state.payment_repo.find_by_id(&payment_id).await.unwrap().unwrap();
    assert_eq!(stored.approved_by.as_deref(), Some("operator-1"));
    assert_eq!(invoice_status(&app, &reservation, &deposit).await, "COMPLETED");
}

#[tokio::test]
async fn test_concurrent_approvals_resolve_to_one_winner() {
    let app = TestApp::new().await;
    let (_, deposit, _) = seed_planned_booking(&app, "Studio P4").await;

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "BANK_TRANSFER"
    })).await;
    let payment_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let mut set = JoinSet::new();
    for i in 0..5 {
        let ledger = app.state.ledger.clone();
        let payment_id = payment_id.clone();
        set.spawn(async move {
            ledger.approve(&payment_id, &format!("operator-{}", i)).await
        });
    }

    let mut approved = 0;
    let mut already = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(_) => approved += 1,
            Err(AppError::AlreadyProcessed(_)) => already += 1,
            Err(e) => panic!("unexpected approval error: {}", e),
        }
    }
    assert_eq!(approved, 1, "exactly one concurrent approval must win");
    assert_eq!(already, 4);
}

#[tokio::test]
async fn test_rejected_payment_can_be_resubmitted() {
    let app = TestApp::new().await;
    let (reservation, deposit, _) = seed_planned_booking(&app, "Studio P5").await;

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "BANK_TRANSFER", "external_reference": "tx-bad"
    })).await;
    let first = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = post_json(&app, &format!("/api/v1/payments/{}/reject", first), json!({
        "reason": "no matching transfer found"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let rejected = parse_body(res).await;
    assert_eq!(rejected["status"], "FAILED");
    assert_eq!(rejected["approval_status"], "REJECTED");
    assert_eq!(rejected["rejection_reason"], "no matching transfer found");

    // The invoice stays open for another attempt.
    assert_eq!(invoice_status(&app, &reservation, &deposit).await, "PENDING");

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "BANK_TRANSFER", "external_reference": "tx-good"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = post_json(&app, &format!("/api/v1/payments/{}/approve", second), json!({
        "approver_id": "operator-1"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(invoice_status(&app, &reservation, &deposit).await, "COMPLETED");

    // Rejecting the already-rejected first payment again is an error.
    let res = post_json(&app, &format!("/api/v1/payments/{}/reject", first), json!({
        "reason": "again"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "ALREADY_PROCESSED");
}

#[tokio::test]
async fn test_payment_validation() {
    let app = TestApp::new().await;
    let (_, deposit, _) = seed_planned_booking(&app, "Studio P6").await;

    // Amount must match the invoice exactly.
    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 49_999, "method": "CARD"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["code"], "VALIDATION");

    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "IOU"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A settled invoice takes no further payments.
    post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "CARD"
    })).await;
    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "CARD"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "ALREADY_PROCESSED");

    let res = post_json(&app, "/api/v1/invoices/missing/payments", json!({
        "amount_cents": 50_000, "method": "CARD"
    })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overdue_sweep_flips_past_due_invoices() {
    let app = TestApp::new().await;
    let (reservation, deposit, installments) = seed_planned_booking(&app, "Studio P7").await;

    // Settle the deposit so only the dated installments are in scope.
    post_json(&app, &format!("/api/v1/invoices/{}/payments", deposit), json!({
        "amount_cents": 50_000, "method": "CARD"
    })).await;

    // Only the first two installments (due 2025-10-01 and 2026-01-01) are past.
    let res = post_json(&app, "/api/v1/invoices/sweep-overdue", json!({ "as_of": "2026-02-01" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["marked_overdue"], 2);

    let invoices = parse_body(get(&app, &format!("/api/v1/reservations/{}/invoices", reservation)).await).await;
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices[1]["status"], "OVERDUE");
    assert_eq!(invoices[2]["status"], "OVERDUE");
    assert_eq!(invoices[3]["status"], "PENDING");

    // Overdue lines carry the advisory late fee: 1000 flat + 2% of 223333.
    assert_eq!(invoices[1]["late_fee_cents"], 5_467);
    assert!(invoices[3]["late_fee_cents"].is_null());

    // The sweep is idempotent for already-flipped lines.
    let res = post_json(&app, "/api/v1/invoices/sweep-overdue", json!({ "as_of": "2026-02-01" })).await;
    assert_eq!(parse_body(res).await["marked_overdue"], 0);

    // An overdue invoice can still be paid.
    let res = post_json(&app, &format!("/api/v1/invoices/{}/payments", installments[0]), json!({
        "amount_cents": 223_333, "method": "CARD"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(invoice_status(&app, &reservation, &installments[0]).await, "COMPLETED");
}
