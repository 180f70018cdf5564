use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::dtos::requests::WebhookBookingRequest;
use crate::domain::models::reservation::NewReservationParams;
use crate::error::AppError;
use crate::state::AppState;

/// Booking pushed by the public site's widget. The widget has already
/// collected the card deposit, so the payment reference it sends settles
/// the deposit invoice immediately and the reservation comes out confirmed.
pub async fn webhook_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<WebhookBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = headers.get("X-Hook-Token").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if token != state.config.webhook_token {
        warn!("Webhook booking rejected: invalid token");
        return Err(AppError::Unauthorized);
    }

    let params = NewReservationParams {
        occupant_id: payload.occupant_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        occupant_kind: "TOURIST".to_string(),
        occupant_name: payload.name,
        occupant_email: payload.email,
        unit_id: payload.unit_id,
        period_id: payload.period_id,
        plan_id: payload.plan_id,
        total_cents: payload.total_cents,
        check_in_date: None,
        check_out_date: None,
    };

    let created = state.reservations.create(params).await?;

    let invoices = state.invoice_repo.list_by_reservation(&created.id).await?;
    let deposit = invoices.iter().find(|i| i.kind == "DEPOSIT")
        .ok_or(AppError::Internal)?;

    // Deposit settlement is what flips the reservation to CONFIRMED.
    state.ledger
        .record_payment(&deposit.id, deposit.amount_cents, "CARD", Some(payload.payment_reference))
        .await?;

    let reservation = state.reservation_repo.find_by_id(&created.id).await?
        .ok_or(AppError::Internal)?;
    info!("Webhook booking confirmed: {}", reservation.id);
    Ok(Json(reservation))
}
