use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreatePlanRequest;
use crate::domain::models::plan::{InstallmentPlan, NewPlanParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.number_of_installments < 1 {
        return Err(AppError::InvalidPlan("plan must have at least one installment".into()));
    }
    if payload.due_dates.len() != payload.number_of_installments as usize {
        return Err(AppError::InvalidPlan(format!(
            "{} due dates supplied for {} installments",
            payload.due_dates.len(),
            payload.number_of_installments
        )));
    }
    if payload.deposit_cents <= 0 {
        return Err(AppError::InvalidPlan("deposit must be positive".into()));
    }
    let discount = payload.discount_percentage.unwrap_or(0.0);
    if !(0.0..=100.0).contains(&discount) {
        return Err(AppError::InvalidPlan("discount percentage must be between 0 and 100".into()));
    }

    let plan = state.plan_repo.create(&InstallmentPlan::new(NewPlanParams {
        name: payload.name,
        number_of_installments: payload.number_of_installments,
        discount_percentage: discount,
        late_fee_percentage: payload.late_fee_percentage.unwrap_or(0.0),
        late_fee_flat_cents: payload.late_fee_flat_cents.unwrap_or(0),
        due_dates: payload.due_dates,
        deposit_cents: payload.deposit_cents,
    })).await?;

    info!("Installment plan created: {} ({})", plan.id, plan.name);
    Ok(Json(plan))
}

pub async fn list_plans(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let plans = state.plan_repo.list().await?;
    Ok(Json(plans))
}

pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let plan = state.plan_repo.find_by_id(&plan_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Installment plan {} not found", plan_id)))?;
    Ok(Json(plan))
}
