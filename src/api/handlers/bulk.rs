use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::BulkBookingRequest;
use crate::api::dtos::responses::BulkRowResult;
use crate::domain::models::reservation::NewReservationParams;
use crate::error::AppError;
use crate::state::AppState;

/// Bulk student intake. Rows arrive pre-parsed (the CSV/WordPress importer
/// is upstream); each row books independently so one contended unit never
/// sinks the rest of the upload.
pub async fn bulk_create_bookings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BulkBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.rows.is_empty() {
        return Err(AppError::Validation("upload contains no rows".into()));
    }

    let total = payload.rows.len();
    let mut results = Vec::with_capacity(total);

    for (idx, row) in payload.rows.into_iter().enumerate() {
        let params = NewReservationParams {
            occupant_id: row.occupant_id,
            occupant_kind: row.occupant_kind.unwrap_or_else(|| "STUDENT".to_string()),
            occupant_name: row.name,
            occupant_email: row.email,
            unit_id: row.unit_id,
            period_id: row.period_id,
            plan_id: row.plan_id,
            total_cents: row.total_cents,
            check_in_date: None,
            check_out_date: None,
        };

        match state.reservations.create(params).await {
            Ok(reservation) => results.push(BulkRowResult {
                row: idx,
                reservation_id: Some(reservation.id),
                error: None,
                code: None,
            }),
            Err(e) => {
                warn!("Bulk booking row {} failed: {}", idx, e);
                results.push(BulkRowResult {
                    row: idx,
                    reservation_id: None,
                    code: Some(e.code().to_string()),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let booked = results.iter().filter(|r| r.reservation_id.is_some()).count();
    info!("Bulk upload processed: {}/{} rows booked", booked, total);
    Ok(Json(results))
}
