use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit and idempotency anchor for the multi-step rebooking operation.
/// `needs_refund_review` marks the failed-but-charged outcome: a deposit was
/// captured but no unit could be allocated, so the money must be reconciled
/// by hand, never dropped.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RebookingRecord {
    pub id: String,
    pub original_reservation_id: String,
    pub new_reservation_id: Option<String>,
    pub new_period_id: String,
    pub deposit_payment_id: Option<String>,
    pub status: String,
    pub failure_reason: Option<String>,
    pub needs_refund_review: bool,
    pub created_at: DateTime<Utc>,
}

impl RebookingRecord {
    pub fn new(original_reservation_id: String, new_period_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_reservation_id,
            new_reservation_id: None,
            new_period_id,
            deposit_payment_id: None,
            status: "INITIATED".to_string(),
            failure_reason: None,
            needs_refund_review: false,
            created_at: Utc::now(),
        }
    }
}
