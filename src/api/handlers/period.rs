use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreatePeriodRequest;
use crate::domain::models::period::Period;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_period(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePeriodRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.ends_on <= payload.starts_on {
        return Err(AppError::Validation("period must end after it starts".into()));
    }
    let period = state.period_repo
        .create(&Period::new(payload.name, payload.starts_on, payload.ends_on))
        .await?;
    info!("Period created: {} ({})", period.id, period.name);
    Ok(Json(period))
}

pub async fn list_periods(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let periods = state.period_repo.list().await?;
    Ok(Json(periods))
}

pub async fn activate_period(
    State(state): State<Arc<AppState>>,
    Path(period_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.period_repo.activate(&period_id).await?;
    info!("Period {} activated", period_id);
    let period = state.period_repo.find_by_id(&period_id).await?
        .ok_or(AppError::Internal)?;
    Ok(Json(period))
}
