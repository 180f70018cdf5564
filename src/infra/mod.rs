pub mod directory;
pub mod factory;
pub mod gateway;
pub mod notify;
pub mod repositories;
