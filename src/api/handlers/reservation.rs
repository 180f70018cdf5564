use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::dtos::requests::{CreateBookingRequest, ReservationListQuery};
use crate::api::dtos::responses::{InvoiceResponse, ReservationDetailResponse};
use crate::domain::models::{invoice::Invoice, plan::InstallmentPlan, reservation::NewReservationParams};
use crate::domain::services::schedule::late_fee_cents;
use crate::error::AppError;
use crate::state::AppState;

/// Public tourist-booking entry point. Students normally arrive through the
/// bulk upload, but a single student booking is accepted here too.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let occupant_kind = payload.occupant_kind.unwrap_or_else(|| "TOURIST".to_string());
    if occupant_kind != "STUDENT" && occupant_kind != "TOURIST" {
        return Err(AppError::Validation("occupant_kind must be STUDENT or TOURIST".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("occupant name must not be empty".into()));
    }

    let params = NewReservationParams {
        occupant_id: payload.occupant_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        occupant_kind,
        occupant_name: payload.name,
        occupant_email: payload.email,
        unit_id: payload.unit_id,
        period_id: payload.period_id,
        plan_id: payload.plan_id,
        total_cents: payload.total_cents,
        check_in_date: payload.check_in_date,
        check_out_date: payload.check_out_date,
    };

    let created = state.reservations.create(params).await?;
    info!("Booking created: {}", created.id);
    Ok(Json(created))
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReservationListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = match query.period_id {
        Some(period_id) => state.reservation_repo.list_by_period(&period_id).await?,
        None => state.reservation_repo.list().await?,
    };
    Ok(Json(reservations))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&reservation_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", reservation_id)))?;

    let plan = match &reservation.plan_id {
        Some(plan_id) => state.plan_repo.find_by_id(plan_id).await?,
        None => None,
    };
    let invoices = state.invoice_repo.list_by_reservation(&reservation.id).await?;

    // Directory lookups are display-only; an outage degrades to no profile.
    let occupant = state.occupant_directory
        .get_occupant(&reservation.occupant_id)
        .await
        .ok()
        .flatten();

    Ok(Json(ReservationDetailResponse {
        reservation,
        invoices: with_late_fees(invoices, plan.as_ref()),
        occupant,
    }))
}

pub async fn list_reservation_invoices(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&reservation_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", reservation_id)))?;

    let plan = match &reservation.plan_id {
        Some(plan_id) => state.plan_repo.find_by_id(plan_id).await?,
        None => None,
    };
    let invoices = state.invoice_repo.list_by_reservation(&reservation.id).await?;
    Ok(Json(with_late_fees(invoices, plan.as_ref())))
}

pub async fn confirm_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservations.confirm(&reservation_id).await?;
    Ok(Json(reservation))
}

pub async fn check_in_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservations.check_in(&reservation_id).await?;
    Ok(Json(reservation))
}

pub async fn check_out_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservations.check_out(&reservation_id).await?;
    Ok(Json(reservation))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservations.cancel(&reservation_id).await?;
    Ok(Json(reservation))
}

fn with_late_fees(invoices: Vec<Invoice>, plan: Option<&InstallmentPlan>) -> Vec<InvoiceResponse> {
    invoices.into_iter()
        .map(|invoice| {
            let late_fee = match (plan, invoice.status.as_str()) {
                (Some(p), "OVERDUE") => Some(late_fee_cents(invoice.amount_cents, p)),
                _ => None,
            };
            InvoiceResponse { invoice, late_fee_cents: late_fee }
        })
        .collect()
}
