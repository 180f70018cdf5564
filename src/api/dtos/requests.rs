use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateUnitRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateUnitStatusRequest {
    pub physical_status: String,
}

#[derive(Deserialize)]
pub struct CreatePeriodRequest {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub number_of_installments: i32,
    pub discount_percentage: Option<f64>,
    pub late_fee_percentage: Option<f64>,
    pub late_fee_flat_cents: Option<i64>,
    pub due_dates: Vec<NaiveDate>,
    pub deposit_cents: i64,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub unit_id: String,
    pub period_id: String,
    pub occupant_id: Option<String>,
    pub occupant_kind: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub total_cents: i64,
    pub plan_id: Option<String>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct BulkBookingRow {
    pub occupant_id: String,
    pub occupant_kind: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub unit_id: String,
    pub period_id: String,
    pub total_cents: i64,
    pub plan_id: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkBookingRequest {
    pub rows: Vec<BulkBookingRow>,
}

#[derive(Deserialize)]
pub struct WebhookBookingRequest {
    pub occupant_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub unit_id: String,
    pub period_id: String,
    pub total_cents: i64,
    pub plan_id: Option<String>,
    pub payment_reference: String,
}

#[derive(Deserialize)]
pub struct CreateIntentRequest {
    pub amount_cents: i64,
    pub payer_email: String,
}

#[derive(Deserialize)]
pub struct RecordPaymentRequest {
    pub amount_cents: i64,
    pub method: String,
    pub external_reference: Option<String>,
}

#[derive(Deserialize)]
pub struct ApprovePaymentRequest {
    pub approver_id: String,
}

#[derive(Deserialize)]
pub struct RejectPaymentRequest {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct SweepOverdueRequest {
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CreateRebookingRequest {
    pub original_reservation_id: String,
    pub new_period_id: String,
    pub unit_id: String,
    pub plan_id: Option<String>,
    pub total_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct ReservationListQuery {
    pub period_id: Option<String>,
}
