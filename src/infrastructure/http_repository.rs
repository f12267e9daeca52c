// HTTP repository implementation - Customer-success backend over JSON
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::account::{CustomerAccount, Roster};
use crate::domain::dashboard::{DashboardDataset, DateRange};
use crate::infrastructure::config::BackendSettings;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardRepository {
    client: reqwest::Client,
    host: String,
    token: String,
}

impl HttpDashboardRepository {
    pub fn new(settings: &BackendSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn dataset_url(&self, range: DateRange) -> String {
        format!(
            "{}/dashboard?start={}&end={}",
            self.host,
            urlencoding::encode(&range.start_date.to_string()),
            urlencoding::encode(&range.end_date.to_string())
        )
    }

    fn account_url(&self, account_id: &str) -> String {
        format!("{}/accounts/{}", self.host, urlencoding::encode(account_id))
    }

    fn roster_url(&self) -> String {
        format!("{}/roster", self.host)
    }

    /// GET `url` and decode the JSON body. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn require<T>(found: Option<T>, url: &str) -> Result<T, FetchError> {
        found.ok_or_else(|| FetchError::Status {
            status: StatusCode::NOT_FOUND.as_u16(),
            body: format!("{} not found", url),
        })
    }
}

#[async_trait]
impl DashboardRepository for HttpDashboardRepository {
    async fn fetch_dataset(&self, range: DateRange) -> Result<DashboardDataset, FetchError> {
        let url = self.dataset_url(range);
        let dataset = Self::require(self.get_json(&url).await?, &url)?;
        Ok(dataset)
    }

    async fn fetch_account(&self, account_id: &str) -> Result<Option<CustomerAccount>, FetchError> {
        self.get_json(&self.account_url(account_id)).await
    }

    async fn fetch_roster(&self) -> Result<Roster, FetchError> {
        let url = self.roster_url();
        Self::require(self.get_json(&url).await?, &url)
    }
}
