// Repository trait for dashboard data access
use crate::domain::account::{CustomerAccount, Roster};
use crate::domain::dashboard::{DashboardDataset, DateRange};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to dashboard backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("dashboard backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode dashboard backend response: {0}")]
    Decode(String),
    #[error("dashboard fetch was aborted before completing")]
    Aborted,
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Load the full dataset for a date range
    async fn fetch_dataset(&self, range: DateRange) -> Result<DashboardDataset, FetchError>;

    /// Look up one account's details; `None` when the id is unknown
    async fn fetch_account(&self, account_id: &str) -> Result<Option<CustomerAccount>, FetchError>;

    /// Customers and sales reps available to the filter pickers
    async fn fetch_roster(&self) -> Result<Roster, FetchError>;
}
