use std::sync::Arc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::models::{rebooking::RebookingRecord, reservation::{NewReservationParams, Reservation}};
use crate::domain::ports::{
    InvoiceRepository, NotificationSink, PaymentGateway, PeriodRepository,
    PlanRepository, RebookingRepository, ReservationRepository, UnitRepository,
};
use crate::domain::services::allocator::OccupancyAllocator;
use crate::domain::services::ledger::PaymentLedger;
use crate::domain::services::reservation_service::ReservationLifecycle;
use crate::domain::services::schedule::{generate_schedule, DiscountScope};
use crate::error::AppError;

pub struct RebookParams {
    pub original_reservation_id: String,
    pub new_period_id: String,
    pub unit_id: String,
    pub plan_id: Option<String>,
    /// Defaults to the original reservation's total.
    pub total_cents: Option<i64>,
}

/// Carries an existing occupant into a new period as one user-facing
/// operation: charge the new deposit, allocate the unit, create the
/// confirmed reservation with its schedule, settle the deposit invoice.
///
/// Ordering is configurable. The default charges before allocating: if the
/// unit is taken in the interim the captured charge is surfaced as a
/// failed-but-charged record for manual refund review, never discarded.
/// With `rebook_charge_first = false` the unit is allocated first and a
/// declined charge releases it again.
pub struct RebookingCoordinator {
    rebooking_repo: Arc<dyn RebookingRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    period_repo: Arc<dyn PeriodRepository>,
    plan_repo: Arc<dyn PlanRepository>,
    unit_repo: Arc<dyn UnitRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    allocator: Arc<OccupancyAllocator>,
    lifecycle: Arc<ReservationLifecycle>,
    ledger: Arc<PaymentLedger>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn NotificationSink>,
    config: Config,
}

impl RebookingCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rebooking_repo: Arc<dyn RebookingRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        period_repo: Arc<dyn PeriodRepository>,
        plan_repo: Arc<dyn PlanRepository>,
        unit_repo: Arc<dyn UnitRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        allocator: Arc<OccupancyAllocator>,
        lifecycle: Arc<ReservationLifecycle>,
        ledger: Arc<PaymentLedger>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        Self {
            rebooking_repo, reservation_repo, period_repo, plan_repo, unit_repo,
            invoice_repo, allocator, lifecycle, ledger, gateway, notifier, config,
        }
    }

    pub async fn rebook(&self, params: RebookParams) -> Result<RebookingRecord, AppError> {
        let original = self.reservation_repo.find_by_id(&params.original_reservation_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", params.original_reservation_id)))?;

        self.check_eligibility(&original, &params).await?;

        let plan = match &params.plan_id {
            Some(plan_id) => Some(self.plan_repo.find_by_id(plan_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Installment plan {} not found", plan_id)))?),
            None => None,
        };

        let total_cents = params.total_cents.unwrap_or(original.total_cents);
        let deposit_cents = plan.as_ref()
            .map(|p| p.deposit_cents)
            .unwrap_or(self.config.default_deposit_cents);

        // A bad plan must fail before any money moves.
        let scope = DiscountScope::from_config(&self.config.discount_scope);
        generate_schedule(total_cents, plan.as_ref(), self.config.default_deposit_cents, scope)?;

        let new_period = self.period_repo.find_by_id(&params.new_period_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", params.new_period_id)))?;

        let payer_email = original.occupant_email.clone().unwrap_or_default();
        let record = self.rebooking_repo.create(&RebookingRecord::new(
            original.id.clone(),
            new_period.id.clone(),
        )).await?;
        info!("Rebooking {} initiated: reservation {} -> period {}", record.id, original.id, new_period.id);

        if self.config.rebook_charge_first {
            let charge = match self.gateway.charge(deposit_cents, &self.config.currency, &payer_email).await {
                Ok(charge) => charge,
                Err(e) => {
                    // Nothing captured, nothing allocated: a plain failure.
                    self.fail(&record.id, &format!("deposit charge failed: {}", e), false).await?;
                    return Err(e);
                }
            };

            let occupancy = match self.allocator
                .allocate(&params.unit_id, &new_period.id, &original.occupant_id, new_period.starts_on, new_period.ends_on)
                .await
            {
                Ok(occupancy) => occupancy,
                Err(e) => {
                    // Money is captured but the unit is gone. This outcome
                    // must stay visible and actionable.
                    return self.fail_charged(&record.id, &charge.reference,
                        &format!("unit allocation failed after charge {}: {}", charge.reference, e)).await;
                }
            };

            self.finalize(&record.id, &original, &params, &occupancy.id, &charge.reference, total_cents, deposit_cents).await
        } else {
            let occupancy = match self.allocator
                .allocate(&params.unit_id, &new_period.id, &original.occupant_id, new_period.starts_on, new_period.ends_on)
                .await
            {
                Ok(occupancy) => occupancy,
                Err(e) => {
                    self.fail(&record.id, &format!("unit allocation failed: {}", e), false).await?;
                    return Err(e);
                }
            };

            let charge = match self.gateway.charge(deposit_cents, &self.config.currency, &payer_email).await {
                Ok(charge) => charge,
                Err(e) => {
                    // Compensation is safe on this side: give the unit back.
                    if let Err(release_err) = self.allocator.release(&occupancy.id).await {
                        error!("Failed to release occupancy {} after declined charge: {}", occupancy.id, release_err);
                    }
                    self.fail(&record.id, &format!("deposit charge failed: {}", e), false).await?;
                    return Err(e);
                }
            };

            self.finalize(&record.id, &original, &params, &occupancy.id, &charge.reference, total_cents, deposit_cents).await
        }
    }

    pub async fn get(&self, id: &str) -> Result<RebookingRecord, AppError> {
        self.rebooking_repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Rebooking {} not found", id)))
    }

    /// Failed-but-charged records awaiting manual reconciliation.
    pub async fn list_refund_review(&self) -> Result<Vec<RebookingRecord>, AppError> {
        self.rebooking_repo.list_refund_review().await
    }

    async fn check_eligibility(&self, original: &Reservation, params: &RebookParams) -> Result<(), AppError> {
        if original.status != "CONFIRMED" && original.status != "CHECKED_IN" {
            return Err(AppError::IneligibleForRebooking(format!(
                "reservation is {}, expected CONFIRMED or CHECKED_IN", original.status
            )));
        }

        let current_period = self.period_repo.find_by_id(&original.period_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", original.period_id)))?;
        if !current_period.is_active {
            return Err(AppError::IneligibleForRebooking(
                "original reservation does not belong to the active period".to_string(),
            ));
        }

        if params.new_period_id == original.period_id {
            return Err(AppError::IneligibleForRebooking(
                "target period matches the current one".to_string(),
            ));
        }

        if self.reservation_repo
            .find_active_for_occupant(&original.occupant_id, &params.new_period_id)
            .await?
            .is_some()
        {
            return Err(AppError::IneligibleForRebooking(
                "occupant already holds a reservation for the target period".to_string(),
            ));
        }

        // Courtesy pre-check before any charge; the allocator's conditional
        // insert remains the authoritative arbiter.
        let unit = self.unit_repo.find_by_id(&params.unit_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Unit {} not found", params.unit_id)))?;
        if unit.physical_status == "MAINTENANCE" {
            return Err(AppError::UnitUnavailable(format!("unit {} is under maintenance", params.unit_id)));
        }

        Ok(())
    }

    async fn finalize(
        &self,
        record_id: &str,
        original: &Reservation,
        params: &RebookParams,
        occupancy_id: &str,
        charge_reference: &str,
        total_cents: i64,
        deposit_cents: i64,
    ) -> Result<RebookingRecord, AppError> {
        let new_params = NewReservationParams {
            occupant_id: original.occupant_id.clone(),
            occupant_kind: original.occupant_kind.clone(),
            occupant_name: original.occupant_name.clone(),
            occupant_email: original.occupant_email.clone(),
            unit_id: params.unit_id.clone(),
            period_id: params.new_period_id.clone(),
            plan_id: params.plan_id.clone(),
            total_cents,
            check_in_date: None,
            check_out_date: None,
        };

        let new_reservation = match self.lifecycle
            .create_with_occupancy(new_params, occupancy_id, "CONFIRMED")
            .await
        {
            Ok(reservation) => reservation,
            Err(e) => {
                return self.fail_charged(record_id, charge_reference,
                    &format!("reservation creation failed after charge {}: {}", charge_reference, e)).await;
            }
        };

        let invoices = self.invoice_repo.list_by_reservation(&new_reservation.id).await?;
        let deposit_invoice = match invoices.iter().find(|i| i.kind == "DEPOSIT") {
            Some(invoice) => invoice.clone(),
            None => {
                return self.fail_charged(record_id, charge_reference,
                    &format!("no deposit invoice on reservation {} after charge {}", new_reservation.id, charge_reference)).await;
            }
        };

        let payment = match self.ledger
            .record_payment(&deposit_invoice.id, deposit_cents, "CARD", Some(charge_reference.to_string()))
            .await
        {
            Ok(payment) => payment,
            Err(e) => {
                return self.fail_charged(record_id, charge_reference,
                    &format!("deposit settlement failed after charge {}: {}", charge_reference, e)).await;
            }
        };

        self.rebooking_repo.mark_confirmed(record_id, &new_reservation.id, &payment.id).await?;
        info!("Rebooking {} confirmed: new reservation {}", record_id, new_reservation.id);
        self.notify("rebooking_confirmed", json!({
            "rebooking_id": record_id,
            "new_reservation_id": new_reservation.id,
        }));

        self.get(record_id).await
    }

    async fn fail(&self, record_id: &str, reason: &str, needs_refund_review: bool) -> Result<(), AppError> {
        self.rebooking_repo.mark_failed(record_id, reason, needs_refund_review).await?;
        warn!("Rebooking {} failed: {}", record_id, reason);
        self.notify("rebooking_failed", json!({
            "rebooking_id": record_id,
            "reason": reason,
        }));
        Ok(())
    }

    /// Post-charge failure: the record carries the refund-review flag and is
    /// returned to the caller as the actionable handle, not buried in an
    /// opaque error.
    async fn fail_charged(&self, record_id: &str, charge_reference: &str, reason: &str) -> Result<RebookingRecord, AppError> {
        self.rebooking_repo.mark_failed(record_id, reason, true).await?;
        error!("Rebooking {} failed after capture ({}): {}", record_id, charge_reference, reason);
        self.notify("rebooking_refund_review", json!({
            "rebooking_id": record_id,
            "payment_reference": charge_reference,
            "reason": reason,
        }));
        self.get(record_id).await
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
