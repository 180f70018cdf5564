use std::sync::Arc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::models::{invoice::Invoice, reservation::{NewReservationParams, Reservation}};
use crate::domain::ports::{
    InvoiceRepository, NotificationSink, PeriodRepository, PlanRepository,
    ReservationRepository, UnitRepository,
};
use crate::domain::services::allocator::OccupancyAllocator;
use crate::domain::services::schedule::{generate_schedule, DiscountScope, ScheduleLine};
use crate::error::AppError;

/// State machine for a single booking. All four booking entry points
/// (tourist, bulk upload, webhook, rebooking) create reservations through
/// this service; none of them touches occupancy or invoices directly.
pub struct ReservationLifecycle {
    reservation_repo: Arc<dyn ReservationRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    plan_repo: Arc<dyn PlanRepository>,
    period_repo: Arc<dyn PeriodRepository>,
    unit_repo: Arc<dyn UnitRepository>,
    allocator: Arc<OccupancyAllocator>,
    notifier: Arc<dyn NotificationSink>,
    config: Config,
}

impl ReservationLifecycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reservation_repo: Arc<dyn ReservationRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        plan_repo: Arc<dyn PlanRepository>,
        period_repo: Arc<dyn PeriodRepository>,
        unit_repo: Arc<dyn UnitRepository>,
        allocator: Arc<OccupancyAllocator>,
        notifier: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        Self { reservation_repo, invoice_repo, plan_repo, period_repo, unit_repo, allocator, notifier, config }
    }

    /// Books a unit for an occupant. Ordering matters: the schedule is
    /// derived first (pure, nothing written), then the unit is allocated,
    /// then reservation and invoices are persisted in one transaction. A
    /// failure at any step leaves zero partial state; a persistence failure
    /// after allocation releases the occupancy again.
    pub async fn create(&self, params: NewReservationParams) -> Result<Reservation, AppError> {
        let lines = self.resolve_schedule(&params).await?;
        let deposit_cents = lines.first().map(|l| l.amount_cents).unwrap_or(0);

        let period = self.period_repo.find_by_id(&params.period_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", params.period_id)))?;

        let check_in = params.check_in_date.unwrap_or(period.starts_on);
        let check_out = params.check_out_date.unwrap_or(period.ends_on);
        if check_out <= check_in {
            return Err(AppError::Validation("check-out date must be after check-in date".to_string()));
        }

        let occupancy = self.allocator
            .allocate(&params.unit_id, &params.period_id, &params.occupant_id, check_in, check_out)
            .await?;

        let mut reservation = Reservation::new(&params, deposit_cents);
        reservation.occupancy_id = Some(occupancy.id.clone());
        let invoices = materialize(&reservation.id, &lines);

        match self.reservation_repo.create_with_invoices(&reservation, &invoices).await {
            Ok(created) => {
                info!("Reservation {} created for occupant {} (unit {}, period {})",
                    created.id, created.occupant_id, created.unit_id, created.period_id);
                self.notify("reservation_created", json!({
                    "reservation_id": created.id,
                    "occupant_id": created.occupant_id,
                    "unit_id": created.unit_id,
                    "period_id": created.period_id,
                }));
                Ok(created)
            }
            Err(e) => {
                // Give the unit back rather than stranding it on a booking
                // that was never written.
                if let Err(release_err) = self.allocator.release(&occupancy.id).await {
                    error!("Failed to release occupancy {} after create failure: {}", occupancy.id, release_err);
                }
                Err(e)
            }
        }
    }

    /// Rebooking variant: the coordinator has already allocated the unit,
    /// so this persists the reservation against that occupancy without a
    /// second allocate.
    pub async fn create_with_occupancy(
        &self,
        params: NewReservationParams,
        occupancy_id: &str,
        initial_status: &str,
    ) -> Result<Reservation, AppError> {
        let lines = self.resolve_schedule(&params).await?;
        let deposit_cents = lines.first().map(|l| l.amount_cents).unwrap_or(0);

        let mut reservation = Reservation::new(&params, deposit_cents);
        reservation.occupancy_id = Some(occupancy_id.to_string());
        reservation.status = initial_status.to_string();
        let invoices = materialize(&reservation.id, &lines);

        let created = self.reservation_repo.create_with_invoices(&reservation, &invoices).await?;
        info!("Reservation {} created against existing occupancy {}", created.id, occupancy_id);
        Ok(created)
    }

    pub async fn confirm(&self, id: &str) -> Result<Reservation, AppError> {
        let reservation = self.require_transition(id, &["PENDING"], "CONFIRMED").await?;
        self.notify("reservation_confirmed", json!({ "reservation_id": reservation.id }));
        Ok(reservation)
    }

    pub async fn check_in(&self, id: &str) -> Result<Reservation, AppError> {
        let reservation = self.require_transition(id, &["CONFIRMED"], "CHECKED_IN").await?;
        self.notify("reservation_checked_in", json!({ "reservation_id": reservation.id }));
        Ok(reservation)
    }

    /// Check-out releases the occupancy and hands the unit to cleaning:
    /// the cached status goes DIRTY and the cleaning collaborator is told.
    pub async fn check_out(&self, id: &str) -> Result<Reservation, AppError> {
        let reservation = self.require_transition(id, &["CHECKED_IN"], "CHECKED_OUT").await?;

        if let Some(occupancy_id) = &reservation.occupancy_id {
            self.allocator.release(occupancy_id).await?;
        }
        self.unit_repo.update_status(&reservation.unit_id, "DIRTY").await?;

        self.notify("reservation_checked_out", json!({ "reservation_id": reservation.id }));
        self.notify("unit_dirty", json!({ "unit_id": reservation.unit_id }));
        Ok(reservation)
    }

    /// Cancellation never rewrites money that already moved: completed
    /// payments and their invoices stay as they are; only still-open
    /// invoices are failed.
    pub async fn cancel(&self, id: &str) -> Result<Reservation, AppError> {
        let reservation = self.require_transition(id, &["PENDING", "CONFIRMED"], "CANCELLED").await?;

        if let Some(occupancy_id) = &reservation.occupancy_id {
            self.allocator.release(occupancy_id).await?;
        }
        let failed = self.invoice_repo.fail_open_for_reservation(&reservation.id).await?;
        info!("Reservation {} cancelled, {} open invoices failed", reservation.id, failed);

        self.notify("reservation_cancelled", json!({ "reservation_id": reservation.id }));
        Ok(reservation)
    }

    async fn resolve_schedule(&self, params: &NewReservationParams) -> Result<Vec<ScheduleLine>, AppError> {
        if params.total_cents <= 0 {
            return Err(AppError::Validation("total amount must be positive".to_string()));
        }

        let plan = match &params.plan_id {
            Some(plan_id) => {
                let plan = self.plan_repo.find_by_id(plan_id).await?
                    .ok_or_else(|| AppError::NotFound(format!("Installment plan {} not found", plan_id)))?;
                if !plan.is_active {
                    return Err(AppError::InvalidPlan(format!("plan {} is no longer active", plan_id)));
                }
                Some(plan)
            }
            None => None,
        };

        let scope = DiscountScope::from_config(&self.config.discount_scope);
        generate_schedule(params.total_cents, plan.as_ref(), self.config.default_deposit_cents, scope)
    }

    async fn require_transition(&self, id: &str, from: &[&str], to: &str) -> Result<Reservation, AppError> {
        let moved = self.reservation_repo.transition(id, from, to).await?;
        if !moved {
            return Err(match self.reservation_repo.find_by_id(id).await? {
                None => AppError::NotFound(format!("Reservation {} not found", id)),
                Some(r) => AppError::Conflict(format!(
                    "Reservation {} is {} and cannot move to {}", id, r.status, to
                )),
            });
        }
        self.reservation_repo.find_by_id(id).await?
            .ok_or(AppError::Internal)
    }

    // Notifications are best-effort and must never block a transition.
    fn notify(&self, event: &'static str, payload: serde_json::Value) {
        let sink = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.notify(event, payload).await {
                warn!("Notification '{}' failed: {}", event, e);
            }
        });
    }
}

fn materialize(reservation_id: &str, lines: &[ScheduleLine]) -> Vec<Invoice> {
    lines.iter()
        .map(|line| Invoice::new(
            reservation_id.to_string(),
            line.kind.clone(),
            line.sequence_number,
            line.amount_cents,
            line.due_date,
        ))
        .collect()
}
