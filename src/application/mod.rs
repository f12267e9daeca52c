// Application layer - Use cases over the dashboard repository
pub mod dashboard_repository;
pub mod dashboard_service;
pub mod dashboard_session;
