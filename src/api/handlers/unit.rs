use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateUnitRequest, UpdateUnitStatusRequest};
use crate::domain::models::unit::Unit;
use crate::error::AppError;
use crate::state::AppState;

// Statuses staff may set directly. OCCUPIED and DIRTY belong to the
// allocator and the reservation lifecycle.
const OPERATIONAL_STATUSES: [&str; 3] = ["VACANT", "CLEANING", "MAINTENANCE"];

pub async fn create_unit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUnitRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("unit name must not be empty".into()));
    }
    let unit = state.unit_repo.create(&Unit::new(payload.name)).await?;
    info!("Unit created: {} ({})", unit.id, unit.name);
    Ok(Json(unit))
}

pub async fn list_units(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let units = state.unit_repo.list().await?;
    Ok(Json(units))
}

pub async fn get_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let unit = state.unit_repo.find_by_id(&unit_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {} not found", unit_id)))?;
    Ok(Json(unit))
}

pub async fn update_unit_status(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<String>,
    Json(payload): Json<UpdateUnitStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !OPERATIONAL_STATUSES.contains(&payload.physical_status.as_str()) {
        return Err(AppError::Validation(
            "status must be one of VACANT, CLEANING, MAINTENANCE".into(),
        ));
    }

    let unit = state.unit_repo.find_by_id(&unit_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Unit {} not found", unit_id)))?;
    if unit.physical_status == "OCCUPIED" {
        return Err(AppError::Conflict(
            "unit is occupied; release the occupancy before changing its status".into(),
        ));
    }

    state.unit_repo.update_status(&unit_id, &payload.physical_status).await?;
    info!("Unit {} status set to {}", unit_id, payload.physical_status);

    let updated = state.unit_repo.find_by_id(&unit_id).await?
        .ok_or(AppError::Internal)?;
    Ok(Json(updated))
}
