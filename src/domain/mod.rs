// Domain layer - Dashboard models and the pure transforms over them
pub mod account;
pub mod customer;
pub mod dashboard;
pub mod format;
pub mod health;
pub mod metrics;
pub mod segment_filter;
pub mod weighted;
