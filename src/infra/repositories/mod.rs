pub mod postgres_invoice_repo;
pub mod postgres_occupancy_repo;
pub mod postgres_payment_repo;
pub mod postgres_period_repo;
pub mod postgres_plan_repo;
pub mod postgres_rebooking_repo;
pub mod postgres_reservation_repo;
pub mod postgres_unit_repo;
pub mod sqlite_invoice_repo;
pub mod sqlite_occupancy_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_period_repo;
pub mod sqlite_plan_repo;
pub mod sqlite_rebooking_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_unit_repo;
