use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of a reservation's payment schedule: the deposit or a numbered
/// installment. The line amounts for a reservation always reconcile exactly
/// against its discounted total.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invoice {
    pub id: String,
    pub reservation_id: String,
    pub kind: String,
    pub sequence_number: Option<i32>,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        reservation_id: String,
        kind: String,
        sequence_number: Option<i32>,
        amount_cents: i64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reservation_id,
            kind,
            sequence_number,
            amount_cents,
            due_date,
            status: "PENDING".to_string(),
            created_at: Utc::now(),
        }
    }
}
