use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A card payment arrives already confirmed by the gateway, so it is born
/// completed and approved. Offline methods (bank transfer, cash, check) go
/// through the two-phase submit/approve workflow.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub amount_cents: i64,
    pub method: String,
    pub status: String,
    pub approval_status: String,
    pub external_reference: Option<String>,
    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        invoice_id: String,
        amount_cents: i64,
        method: String,
        external_reference: Option<String>,
    ) -> Self {
        let instant = method == "CARD";
        Self {
            id: Uuid::new_v4().to_string(),
            invoice_id,
            amount_cents,
            method,
            status: if instant { "COMPLETED" } else { "PENDING" }.to_string(),
            approval_status: if instant { "APPROVED" } else { "PENDING" }.to_string(),
            external_reference,
            approved_by: None,
            rejection_reason: None,
            processed_at: if instant { Some(Utc::now()) } else { None },
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChargeIntent {
    pub client_secret: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayCharge {
    pub reference: String,
}
