use crate::domain::models::{
    invoice::Invoice, occupancy::OccupancyRecord, occupant::OccupantProfile,
    payment::{ChargeIntent, GatewayCharge, Payment}, period::Period,
    plan::InstallmentPlan, rebooking::RebookingRecord, reservation::Reservation,
    unit::Unit,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn create(&self, unit: &Unit) -> Result<Unit, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Unit>, AppError>;
    async fn list(&self) -> Result<Vec<Unit>, AppError>;
    async fn update_status(&self, id: &str, status: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PeriodRepository: Send + Sync {
    async fn create(&self, period: &Period) -> Result<Period, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Period>, AppError>;
    async fn find_active(&self) -> Result<Option<Period>, AppError>;
    async fn list(&self) -> Result<Vec<Period>, AppError>;
    async fn activate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn create(&self, plan: &InstallmentPlan) -> Result<InstallmentPlan, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<InstallmentPlan>, AppError>;
    async fn list(&self) -> Result<Vec<InstallmentPlan>, AppError>;
}

#[async_trait]
pub trait OccupancyRepository: Send + Sync {
    /// Single conditional insert. Implementations map a unique violation on
    /// the occupied (unit_id, period_id) index to `UnitAlreadyOccupied` so
    /// concurrent callers get exactly one winner.
    async fn insert(&self, record: &OccupancyRecord) -> Result<OccupancyRecord, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OccupancyRecord>, AppError>;
    async fn find_occupied(&self, unit_id: &str, period_id: &str) -> Result<Option<OccupancyRecord>, AppError>;
    /// Conditional OCCUPIED -> RELEASED flip. Returns false when the record
    /// was already released (idempotent no-op).
    async fn release(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persists the reservation together with its schedule lines in one
    /// transaction; a failure writes nothing.
    async fn create_with_invoices(&self, reservation: &Reservation, invoices: &[Invoice]) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list(&self) -> Result<Vec<Reservation>, AppError>;
    async fn list_by_period(&self, period_id: &str) -> Result<Vec<Reservation>, AppError>;
    async fn find_active_for_occupant(&self, occupant_id: &str, period_id: &str) -> Result<Option<Reservation>, AppError>;
    /// Conditional status update keyed on the current status. Returns false
    /// when the reservation was not in any of the `from` states.
    async fn transition(&self, id: &str, from: &[&str], to: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError>;
    async fn list_by_reservation(&self, reservation_id: &str) -> Result<Vec<Invoice>, AppError>;
    /// PENDING|OVERDUE -> COMPLETED, conditionally. Returns false when the
    /// invoice was already settled or failed.
    async fn complete_if_open(&self, id: &str) -> Result<bool, AppError>;
    async fn fail_open_for_reservation(&self, reservation_id: &str) -> Result<u64, AppError>;
    async fn mark_overdue(&self, as_of: NaiveDate) -> Result<u64, AppError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError>;
    async fn list_by_invoice(&self, invoice_id: &str) -> Result<Vec<Payment>, AppError>;
    async fn list_pending_approval(&self) -> Result<Vec<Payment>, AppError>;
    /// Conditional update keyed on approval_status = PENDING so two
    /// operators clicking approve resolve to one success. Returns false on
    /// a miss; the caller decides between NotFound and AlreadyProcessed.
    async fn approve_if_pending(&self, id: &str, approver_id: &str) -> Result<bool, AppError>;
    async fn reject_if_pending(&self, id: &str, reason: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RebookingRepository: Send + Sync {
    async fn create(&self, record: &RebookingRecord) -> Result<RebookingRecord, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<RebookingRecord>, AppError>;
    async fn mark_confirmed(&self, id: &str, new_reservation_id: &str, deposit_payment_id: &str) -> Result<(), AppError>;
    async fn mark_failed(&self, id: &str, reason: &str, needs_refund_review: bool) -> Result<(), AppError>;
    async fn list_refund_review(&self) -> Result<Vec<RebookingRecord>, AppError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, amount_cents: i64, currency: &str, payer_email: &str) -> Result<ChargeIntent, AppError>;
    /// Synchronous capture used by the rebooking flow. A timeout surfaces as
    /// `GatewayTimeout` and is treated like a decline by callers.
    async fn charge(&self, amount_cents: i64, currency: &str, payer_email: &str) -> Result<GatewayCharge, AppError>;
}

#[async_trait]
pub trait OccupantDirectory: Send + Sync {
    async fn get_occupant(&self, id: &str) -> Result<Option<OccupantProfile>, AppError>;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &str, payload: serde_json::Value) -> Result<(), AppError>;
}
