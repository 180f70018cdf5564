use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{bulk, health, payment, period, plan, rebooking, reservation, unit, webhook};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Units
        .route("/api/v1/units", post(unit::create_unit).get(unit::list_units))
        .route("/api/v1/units/{unit_id}", get(unit::get_unit))
        .route("/api/v1/units/{unit_id}/status", put(unit::update_unit_status))

        // Periods
        .route("/api/v1/periods", post(period::create_period).get(period::list_periods))
        .route("/api/v1/periods/{period_id}/activate", post(period::activate_period))

        // Installment plans
        .route("/api/v1/plans", post(plan::create_plan).get(plan::list_plans))
        .route("/api/v1/plans/{plan_id}", get(plan::get_plan))

        // Booking entry points
        .route("/api/v1/bookings", post(reservation::create_booking))
        .route("/api/v1/bookings/bulk", post(bulk::bulk_create_bookings))
        .route("/api/v1/hooks/bookings", post(webhook::webhook_booking))

        // Reservation lifecycle
        .route("/api/v1/reservations", get(reservation::list_reservations))
        .route("/api/v1/reservations/{reservation_id}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{reservation_id}/invoices", get(reservation::list_reservation_invoices))
        .route("/api/v1/reservations/{reservation_id}/confirm", post(reservation::confirm_reservation))
        .route("/api/v1/reservations/{reservation_id}/check-in", post(reservation::check_in_reservation))
        .route("/api/v1/reservations/{reservation_id}/check-out", post(reservation::check_out_reservation))
        .route("/api/v1/reservations/{reservation_id}/cancel", post(reservation::cancel_reservation))

        // Payments
        .route("/api/v1/payments/intent", post(payment::create_intent))
        .route("/api/v1/invoices/{invoice_id}/payments", post(payment::record_payment).get(payment::list_invoice_payments))
        .route("/api/v1/invoices/sweep-overdue", post(payment::sweep_overdue))
        .route("/api/v1/payments/pending", get(payment::list_pending_payments))
        .route("/api/v1/payments/{payment_id}/approve", post(payment::approve_payment))
        .route("/api/v1/payments/{payment_id}/reject", post(payment::reject_payment))

        // Rebooking
        .route("/api/v1/rebookings", post(rebooking::create_rebooking))
        .route("/api/v1/rebookings/refund-review", get(rebooking::list_refund_review))
        .route("/api/v1/rebookings/{rebooking_id}", get(rebooking::get_rebooking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
