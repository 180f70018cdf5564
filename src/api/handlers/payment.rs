use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ApprovePaymentRequest, CreateIntentRequest, RecordPaymentRequest, RejectPaymentRequest, SweepOverdueRequest};
use crate::api::dtos::responses::PendingPaymentResponse;
use crate::error::AppError;
use crate::state::AppState;

/// First half of the card flow: the client confirms the intent with the
/// gateway, then the callback records the payment against the invoice.
pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateIntentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount_cents <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    let intent = state.gateway
        .create_intent(payload.amount_cents, &state.config.currency, &payload.payer_email)
        .await?;
    Ok(Json(intent))
}

pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<String>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.ledger
        .record_payment(&invoice_id, payload.amount_cents, &payload.method, payload.external_reference)
        .await?;
    Ok(Json(payment))
}

pub async fn list_invoice_payments(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.invoice_repo.find_by_id(&invoice_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice {} not found", invoice_id)))?;
    let payments = state.payment_repo.list_by_invoice(&invoice_id).await?;
    Ok(Json(payments))
}

/// The pending-payments approval screen: every submitted offline payment
/// with the invoice and reservation it would settle.
pub async fn list_pending_payments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let payments = state.ledger.list_pending().await?;

    let mut rows = Vec::with_capacity(payments.len());
    for payment in payments {
        let invoice = state.invoice_repo.find_by_id(&payment.invoice_id).await?
            .ok_or(AppError::Internal)?;
        let reservation = state.reservation_repo.find_by_id(&invoice.reservation_id).await?
            .ok_or(AppError::Internal)?;
        rows.push(PendingPaymentResponse { payment, invoice, reservation });
    }
    Ok(Json(rows))
}

pub async fn approve_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
    Json(payload): Json<ApprovePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.ledger.approve(&payment_id, &payload.approver_id).await?;
    Ok(Json(invoice))
}

pub async fn reject_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
    Json(payload): Json<RejectPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("a rejection reason is required".into()));
    }
    let payment = state.ledger.reject(&payment_id, &payload.reason).await?;
    Ok(Json(payment))
}

pub async fn sweep_overdue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SweepOverdueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let count = state.ledger.sweep_overdue(as_of).await?;
    info!("Overdue sweep as of {}: {} invoices flipped", as_of, count);
    Ok(Json(json!({ "marked_overdue": count, "as_of": as_of })))
}
