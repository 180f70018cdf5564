pub mod invoice;
pub mod occupancy;
pub mod occupant;
pub mod payment;
pub mod period;
pub mod plan;
pub mod rebooking;
pub mod reservation;
pub mod unit;
