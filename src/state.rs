use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    InvoiceRepository, NotificationSink, OccupancyRepository, OccupantDirectory,
    PaymentGateway, PaymentRepository, PeriodRepository, PlanRepository,
    RebookingRepository, ReservationRepository, UnitRepository,
};
use crate::domain::services::allocator::OccupancyAllocator;
use crate::domain::services::ledger::PaymentLedger;
use crate::domain::services::rebooking_service::RebookingCoordinator;
use crate::domain::services::reservation_service::ReservationLifecycle;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub unit_repo: Arc<dyn UnitRepository>,
    pub period_repo: Arc<dyn PeriodRepository>,
    pub plan_repo: Arc<dyn PlanRepository>,
    pub occupancy_repo: Arc<dyn OccupancyRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub invoice_repo: Arc<dyn InvoiceRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub rebooking_repo: Arc<dyn RebookingRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub occupant_directory: Arc<dyn OccupantDirectory>,
    pub notifier: Arc<dyn NotificationSink>,
    pub allocator: Arc<OccupancyAllocator>,
    pub reservations: Arc<ReservationLifecycle>,
    pub ledger: Arc<PaymentLedger>,
    pub rebooking: Arc<RebookingCoordinator>,
}

impl AppState {
    /// Wires the domain services over whatever repository backend the
    /// caller hands in. Used by the factory for both database flavors and
    /// by the integration tests.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        config: Config,
        unit_repo: Arc<dyn UnitRepository>,
        period_repo: Arc<dyn PeriodRepository>,
        plan_repo: Arc<dyn PlanRepository>,
        occupancy_repo: Arc<dyn OccupancyRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        rebooking_repo: Arc<dyn RebookingRepository>,
        gateway: Arc<dyn PaymentGateway>,
        occupant_directory: Arc<dyn OccupantDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let allocator = Arc::new(OccupancyAllocator::new(
            occupancy_repo.clone(),
            unit_repo.clone(),
        ));
        let reservations = Arc::new(ReservationLifecycle::new(
            reservation_repo.clone(),
            invoice_repo.clone(),
            plan_repo.clone(),
            period_repo.clone(),
            unit_repo.clone(),
            allocator.clone(),
            notifier.clone(),
            config.clone(),
        ));
        let ledger = Arc::new(PaymentLedger::new(
            payment_repo.clone(),
            invoice_repo.clone(),
            reservation_repo.clone(),
            notifier.clone(),
        ));
        let rebooking = Arc::new(RebookingCoordinator::new(
            rebooking_repo.clone(),
            reservation_repo.clone(),
            period_repo.clone(),
            plan_repo.clone(),
            unit_repo.clone(),
            invoice_repo.clone(),
            allocator.clone(),
            reservations.clone(),
            ledger.clone(),
            gateway.clone(),
            notifier.clone(),
            config.clone(),
        ));

        Self {
            config,
            unit_repo,
            period_repo,
            plan_repo,
            occupancy_repo,
            reservation_repo,
            invoice_repo,
            payment_repo,
            rebooking_repo,
            gateway,
            occupant_directory,
            notifier,
            allocator,
            reservations,
            ledger,
            rebooking,
        }
    }
}
