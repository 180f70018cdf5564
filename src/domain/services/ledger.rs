use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::models::{invoice::Invoice, payment::Payment};
use crate::domain::ports::{InvoiceRepository, NotificationSink, PaymentRepository, ReservationRepository};
use crate::error::AppError;

const OFFLINE_METHODS: [&str; 3] = ["BANK_TRANSFER", "CASH", "CHECK"];

/// Records payments against schedule lines and runs the approval workflow
/// for offline methods. Invoice status is written here and nowhere else.
pub struct PaymentLedger {
    payment_repo: Arc<dyn PaymentRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    notifier: Arc<dyn NotificationSink>,
}

impl PaymentLedger {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { payment_repo, invoice_repo, reservation_repo, notifier }
    }

    /// Card payments arrive after the gateway has confirmed funds, so they
    /// complete the invoice synchronously. Offline methods only submit: the
    /// payment and the invoice both stay pending until an operator approves.
    pub async fn record_payment(
        &self,
        invoice_id: &str,
        amount_cents: i64,
        method: &str,
        external_reference: Option<String>,
    ) -> Result<Payment, AppError> {
        if method != "CARD" && !OFFLINE_METHODS.contains(&method) {
            return Err(AppError::Validation(format!("unknown payment method '{}'", method)));
        }
        if amount_cents <= 0 {
            return Err(AppError::Validation("payment amount must be positive".to_string()));
        }

        let invoice = self.invoice_repo.find_by_id(invoice_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        match invoice.status.as_str() {
            "COMPLETED" => return Err(AppError::AlreadyProcessed(format!("Invoice {} is already settled", invoice_id))),
            "FAILED" => return Err(AppError::Conflict(format!("Invoice {} belongs to a cancelled reservation", invoice_id))),
            _ => {}
        }

        if amount_cents != invoice.amount_cents {
            return Err(AppError::Validation(format!(
                "payment of {} does not match invoice amount {}",
                amount_cents, invoice.amount_cents
            )));
        }

        let payment = Payment::new(invoice_id.to_string(), amount_cents, method.to_string(), external_reference);
        let created = self.payment_repo.create(&payment).await?;

        if method == "CARD" {
            self.complete_invoice(&invoice).await?;
        }

        info!("Payment {} recorded for invoice {} ({}, {} cents)", created.id, invoice_id, method, amount_cents);
        self.notify("payment_recorded", json!({
            "payment_id": created.id,
            "invoice_id": invoice_id,
            "method": method,
        }));
        Ok(created)
    }

    /// Single-use by construction: the conditional update succeeds for
    /// exactly one of two operators racing on the same payment; the loser
    /// gets `AlreadyProcessed`, never a silent second completion.
    pub async fn approve(&self, payment_id: &str, approver_id: &str) -> Result<Invoice, AppError> {
        let updated = self.payment_repo.approve_if_pending(payment_id, approver_id).await?;
        if !updated {
            return Err(self.processed_error(payment_id).await?);
        }

        let payment = self.payment_repo.find_by_id(payment_id).await?
            .ok_or(AppError::Internal)?;
        let invoice = self.invoice_repo.find_by_id(&payment.invoice_id).await?
            .ok_or(AppError::Internal)?;
        self.complete_invoice(&invoice).await?;

        info!("Payment {} approved by {}", payment_id, approver_id);
        self.notify("payment_approved", json!({
            "payment_id": payment_id,
            "invoice_id": payment.invoice_id,
            "approver_id": approver_id,
        }));

        self.invoice_repo.find_by_id(&payment.invoice_id).await?
            .ok_or(AppError::Internal)
    }

    /// The invoice stays pending so the occupant can resubmit with a fresh
    /// payment.
    pub async fn reject(&self, payment_id: &str, reason: &str) -> Result<Payment, AppError> {
        let updated = self.payment_repo.reject_if_pending(payment_id, reason).await?;
        if !updated {
            return Err(self.processed_error(payment_id).await?);
        }

        let payment = self.payment_repo.find_by_id(payment_id).await?
            .ok_or(AppError::Internal)?;

        info!("Payment {} rejected: {}", payment_id, reason);
        self.notify("payment_rejected", json!({
            "payment_id": payment_id,
            "invoice_id": payment.invoice_id,
            "reason": reason,
        }));
        Ok(payment)
    }

    pub async fn list_pending(&self) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list_pending_approval().await
    }

    /// Flips past-due pending invoices to OVERDUE. Invoked from the admin
    /// surface; there is no background scheduler.
    pub async fn sweep_overdue(&self, as_of: NaiveDate) -> Result<u64, AppError> {
        let count = self.invoice_repo.mark_overdue(as_of).await?;
        if count > 0 {
            info!("Marked {} invoices overdue as of {}", count, as_of);
        }
        Ok(count)
    }

    async fn complete_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let flipped = self.invoice_repo.complete_if_open(&invoice.id).await?;
        if !flipped {
            return Ok(());
        }

        // A settled deposit is what turns a pending booking into a firm one.
        if invoice.kind == "DEPOSIT" {
            let confirmed = self.reservation_repo
                .transition(&invoice.reservation_id, &["PENDING"], "CONFIRMED")
                .await?;
            if confirmed {
                info!("Reservation {} confirmed by deposit settlement", invoice.reservation_id);
                self.notify("reservation_confirmed", json!({
                    "reservation_id": invoice.reservation_id,
                }));
            }
        }

        self.notify("invoice_completed", json!({
            "invoice_id": invoice.id,
            "reservation_id": invoice.reservation_id,
        }));
        Ok(())
    }

    async fn processed_error(&self, payment_id: &str) -> Result<AppError, AppError> {
        Ok(match self.payment_repo.find_by_id(payment_id).await? {
            None => AppError::NotFound(format!("Payment {} not found", payment_id)),
            Some(p) => AppError::AlreadyProcessed(format!(
                "Payment {} was already {}", payment_id, p.approval_status.to_lowercase()
            )),
        })
    }

    fn notify(&self, event: &'static str, payload: serde_json::Value) {
        let sink = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.notify(event, payload).await {
                warn!("Notification '{}' failed: {}", event, e);
            }
        });
    }
}
