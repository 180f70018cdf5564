use serde::Serialize;
use crate::domain::models::{
    invoice::Invoice, occupant::OccupantProfile, payment::Payment,
    reservation::Reservation,
};

#[derive(Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    /// Advisory late fee for overdue lines on a plan with late-fee rules.
    pub late_fee_cents: Option<i64>,
}

#[derive(Serialize)]
pub struct ReservationDetailResponse {
    pub reservation: Reservation,
    pub invoices: Vec<InvoiceResponse>,
    pub occupant: Option<OccupantProfile>,
}

#[derive(Serialize)]
pub struct BulkRowResult {
    pub row: usize,
    pub reservation_id: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct PendingPaymentResponse {
    pub payment: Payment,
    pub invoice: Invoice,
    pub reservation: Reservation,
}
