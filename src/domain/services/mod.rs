pub mod allocator;
pub mod ledger;
pub mod rebooking_service;
pub mod reservation_service;
pub mod schedule;
