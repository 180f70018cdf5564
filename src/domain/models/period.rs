use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An academic-year-like window ("2025/2026") used as the allocation key
/// alongside the unit. Exactly one period is active at a time.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Period {
    pub fn new(name: String, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            starts_on,
            ends_on,
            is_active: false,
            created_at: Utc::now(),
        }
    }
}
