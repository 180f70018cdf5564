use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Reusable template for splitting a balance into a deposit plus N dated
/// installments. Generated schedules copy these values, so editing a plan
/// never rewrites an existing schedule.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct InstallmentPlan {
    pub id: String,
    pub name: String,
    pub number_of_installments: i32,
    pub discount_percentage: f64,
    pub late_fee_percentage: f64,
    pub late_fee_flat_cents: i64,
    pub due_dates_json: String,
    pub deposit_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPlanParams {
    pub name: String,
    pub number_of_installments: i32,
    pub discount_percentage: f64,
    pub late_fee_percentage: f64,
    pub late_fee_flat_cents: i64,
    pub due_dates: Vec<NaiveDate>,
    pub deposit_cents: i64,
}

impl InstallmentPlan {
    pub fn new(params: NewPlanParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            number_of_installments: params.number_of_installments,
            discount_percentage: params.discount_percentage,
            late_fee_percentage: params.late_fee_percentage,
            late_fee_flat_cents: params.late_fee_flat_cents,
            due_dates_json: serde_json::to_string(&params.due_dates).unwrap_or_else(|_| "[]".to_string()),
            deposit_cents: params.deposit_cents,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn due_dates(&self) -> Vec<NaiveDate> {
        serde_json::from_str(&self.due_dates_json).unwrap_or_default()
    }
}
