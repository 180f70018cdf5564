use axum::{extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use std::sync::Arc;

use crate::api::dtos::requests::CreateRebookingRequest;
use crate::domain::services::rebooking_service::RebookParams;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_rebooking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRebookingRequest>,
) -> Result<Response, AppError> {
    let record = state.rebooking.rebook(RebookParams {
        original_reservation_id: payload.original_reservation_id,
        new_period_id: payload.new_period_id,
        unit_id: payload.unit_id,
        plan_id: payload.plan_id,
        total_cents: payload.total_cents,
    }).await?;

    // A FAILED record coming back Ok means the deposit was captured but the
    // operation could not finish. Distinct, urgent category for the UI.
    if record.status == "FAILED" {
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": record.failure_reason,
                "code": "REFUND_REVIEW_REQUIRED",
                "rebooking": record,
            })),
        ).into_response());
    }

    Ok(Json(record).into_response())
}

pub async fn get_rebooking(
    State(state): State<Arc<AppState>>,
    Path(rebooking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.rebooking.get(&rebooking_id).await?;
    Ok(Json(record))
}

pub async fn list_refund_review(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.rebooking.list_refund_review().await?;
    Ok(Json(records))
}
