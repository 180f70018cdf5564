use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub occupant_id: String,
    pub occupant_kind: String,
    pub occupant_name: String,
    pub occupant_email: Option<String>,
    pub unit_id: String,
    pub period_id: String,
    pub plan_id: Option<String>,
    pub occupancy_id: Option<String>,
    pub status: String,
    pub total_cents: i64,
    pub deposit_cents: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub occupant_id: String,
    pub occupant_kind: String,
    pub occupant_name: String,
    pub occupant_email: Option<String>,
    pub unit_id: String,
    pub period_id: String,
    pub plan_id: Option<String>,
    pub total_cents: i64,
    pub check_in_date: Option<chrono::NaiveDate>,
    pub check_out_date: Option<chrono::NaiveDate>,
}

impl Reservation {
    pub fn new(params: &NewReservationParams, deposit_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            occupant_id: params.occupant_id.clone(),
            occupant_kind: params.occupant_kind.clone(),
            occupant_name: params.occupant_name.clone(),
            occupant_email: params.occupant_email.clone(),
            unit_id: params.unit_id.clone(),
            period_id: params.period_id.clone(),
            plan_id: params.plan_id.clone(),
            occupancy_id: None,
            status: "PENDING".to_string(),
            total_cents: params.total_cents,
            deposit_cents,
            created_at: Utc::now(),
        }
    }
}
