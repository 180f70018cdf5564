use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Physical status is a convenience cache for dashboards. The authoritative
/// occupancy truth lives in `OccupancyRecord`; only the allocator and the
/// reservation lifecycle write this field, plus the operational statuses
/// (maintenance, cleaning) set by staff.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub physical_status: String,
    pub created_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            physical_status: "VACANT".to_string(),
            created_at: Utc::now(),
        }
    }
}
