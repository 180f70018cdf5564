use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Authoritative record of who holds a unit for a period. A partial unique
/// index guarantees at most one OCCUPIED row per (unit_id, period_id).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OccupancyRecord {
    pub id: String,
    pub unit_id: String,
    pub period_id: String,
    pub occupant_id: String,
    pub status: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OccupancyRecord {
    pub fn new(
        unit_id: String,
        period_id: String,
        occupant_id: String,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            unit_id,
            period_id,
            occupant_id,
            status: "OCCUPIED".to_string(),
            check_in_date,
            check_out_date,
            released_at: None,
            created_at: Utc::now(),
        }
    }
}
