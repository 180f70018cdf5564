use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;

use crate::domain::models::occupancy::OccupancyRecord;
use crate::domain::ports::{OccupancyRepository, UnitRepository};
use crate::error::AppError;

/// The sole mutual-exclusion point for unit allocation. Everything that
/// needs a unit held for a period goes through `allocate`; nothing else
/// writes occupancy rows.
pub struct OccupancyAllocator {
    occupancy_repo: Arc<dyn OccupancyRepository>,
    unit_repo: Arc<dyn UnitRepository>,
}

impl OccupancyAllocator {
    pub fn new(occupancy_repo: Arc<dyn OccupancyRepository>, unit_repo: Arc<dyn UnitRepository>) -> Self {
        Self { occupancy_repo, unit_repo }
    }

    pub async fn allocate(
        &self,
        unit_id: &str,
        period_id: &str,
        occupant_id: &str,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
    ) -> Result<OccupancyRecord, AppError> {
        let unit = self.unit_repo.find_by_id(unit_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Unit {} not found", unit_id)))?;

        // Operational unavailability, distinct from being booked.
        if unit.physical_status == "MAINTENANCE" {
            return Err(AppError::UnitUnavailable(format!("unit {} is under maintenance", unit_id)));
        }

        let record = OccupancyRecord::new(
            unit_id.to_string(),
            period_id.to_string(),
            occupant_id.to_string(),
            check_in_date,
            check_out_date,
        );

        // No pre-read: the repo's conditional insert is the race arbiter.
        let created = self.occupancy_repo.insert(&record).await?;
        self.unit_repo.update_status(unit_id, "OCCUPIED").await?;

        info!("Unit {} allocated to occupant {} for period {}", unit_id, occupant_id, period_id);
        Ok(created)
    }

    /// Releasing twice is a no-op, not an error.
    pub async fn release(&self, occupancy_id: &str) -> Result<(), AppError> {
        let record = self.occupancy_repo.find_by_id(occupancy_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Occupancy record {} not found", occupancy_id)))?;

        let flipped = self.occupancy_repo.release(occupancy_id).await?;
        if flipped {
            self.unit_repo.update_status(&record.unit_id, "VACANT").await?;
            info!("Occupancy {} released, unit {} vacant", occupancy_id, record.unit_id);
        }
        Ok(())
    }
}
