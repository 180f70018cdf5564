mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
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

fn booking(unit_id: &str, period_id: &str, name: &str) -> Value {
    json!({
        "unit_id": unit_id,
        "period_id": period_id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "total_cents": 720_000
    })
}

#[tokio::test]
async fn test_double_booking_rejected() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio 1").await;
    let period = seed_period(&app, "2025/2026").await;

    let res = post_json(&app, "/api/v1/bookings", booking(&unit, &period, "Alice")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_json(&app, "/api/v1/bookings", booking(&unit, &period, "Bob")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "UNIT_ALREADY_OCCUPIED");

    // Fail fast: Bob's attempt left no rows behind.
    let list = parse_body(get(&app, "/api/v1/reservations").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_allocation_has_single_winner() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio 2").await;
    let period = seed_period(&app, "2025/2026").await;

    let check_in = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let check_out = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();

    let mut set = JoinSet::new();
    for i in 0..10 {
        let allocator = app.state.allocator.clone();
        let unit = unit.clone();
        let period = period.clone();
        set.spawn(async move {
            allocator.allocate(&unit, &period, &format!("occupant-{}", i), check_in, check_out).await
        });
    }

    let mut winners = 0;
    let mut conflicts = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(_) => winners += 1,
            Err(AppError::UnitAlreadyOccupied) => conflicts += 1,
            Err(e) => panic!("unexpected allocation error: {}", e),
        }
    }

    assert_eq!(winners, 1, "exactly one concurrent allocation must win");
    assert_eq!(conflicts, 9);

    let record = app.state.occupancy_repo.find_occupied(&unit, &period).await.unwrap();
    assert!(record.is_some());
}

#[tokio::test]
async fn test_maintenance_unit_rejected() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio 3").await;
    let period = seed_period(&app, "2025/2026").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/units/{}/status", unit))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "physical_status": "MAINTENANCE" }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_json(&app, "/api/v1/bookings", booking(&unit, &period, "Alice")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "UNIT_UNAVAILABLE");
}

#[tokio::test]
async fn test_release_is_idempotent() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio 4").await;
    let period = seed_period(&app, "2025/2026").await;

    let check_in = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let check_out = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();

    let record = app.state.allocator
        .allocate(&unit, &period, "occupant-1", check_in, check_out)
        .await
        .unwrap();

    app.state.allocator.release(&record.id).await.unwrap();
    // Second release is a no-op, not an error.
    app.state.allocator.release(&record.id).await.unwrap();

    let stored = app.state.occupancy_repo.find_by_id(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "RELEASED");
    assert!(stored.released_at.is_some());

    let unit_body = parse_body(get(&app, &format!("/api/v1/units/{}", unit)).await).await;
    assert_eq!(unit_body["physical_status"], "VACANT");
}

#[tokio::test]
async fn test_unit_can_be_reallocated_after_release() {
    let app = TestApp::new().await;
    let unit = seed_unit(&app, "Studio 5").await;
    let period = seed_period(&app, "2025/2026").await;

    let check_in = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let check_out = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();

    let first = app.state.allocator
        .allocate(&unit, &period, "occupant-1", check_in, check_out)
        .await
        .unwrap();
    app.state.allocator.release(&first.id).await.unwrap();

    let second = app.state.allocator
        .allocate(&unit, &period, "occupant-2", check_in, check_out)
        .await
        .unwrap();
    assert_eq!(second.occupant_id, "occupant-2");
    assert_eq!(second.status, "OCCUPIED");
}
