// Dashboard session - Current dataset, user selections and the date-range loader
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::dashboard::{DashboardDataset, DateRange};
use crate::domain::segment_filter::SegmentFilter;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;

/// What the user currently has selected in the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub segment: SegmentFilter,
    pub customer_id: Option<String>,
    pub sales_rep_id: Option<String>,
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The fetched dataset is now the session's current dataset.
    Applied(Arc<DashboardDataset>),
    /// A newer request was issued before this one finished; its result was dropped.
    Superseded { request: u64 },
}

struct Loaded {
    request: u64,
    dataset: Arc<DashboardDataset>,
}

/// State for one dashboard session. Datasets are swapped wholesale; a load
/// only commits if no newer load was issued in the meantime.
pub struct DashboardSession {
    repository: Arc<dyn DashboardRepository>,
    current: RwLock<Option<Loaded>>,
    selection: RwLock<Selection>,
    in_flight: Mutex<Option<(u64, AbortHandle)>>,
    latest_request: AtomicU64,
}

impl DashboardSession {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        Self {
            repository,
            current: RwLock::new(None),
            selection: RwLock::new(Selection::default()),
            in_flight: Mutex::new(None),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn repository(&self) -> &Arc<dyn DashboardRepository> {
        &self.repository
    }

    pub async fn dataset(&self) -> Option<Arc<DashboardDataset>> {
        self.current.read().await.as_ref().map(|l| l.dataset.clone())
    }

    /// Sequence number of the request whose dataset is current.
    pub async fn loaded_request(&self) -> Option<u64> {
        self.current.read().await.as_ref().map(|l| l.request)
    }

    pub async fn selection(&self) -> Selection {
        self.selection.read().await.clone()
    }

    pub async fn select(&self, selection: Selection) {
        tracing::debug!("Selection changed: {:?}", selection);
        *self.selection.write().await = selection;
    }

    /// Fetch the dataset for `range` and make it current.
    ///
    /// Issuing a new load aborts the previous in-flight fetch. A fetch that
    /// finishes after a newer request was issued reports `Superseded` and
    /// leaves the session untouched. Failures are returned as-is and never
    /// clear the current dataset.
    pub async fn load(&self, range: DateRange) -> Result<LoadOutcome, FetchError> {
        let (request, handle) = {
            let mut in_flight = self.in_flight.lock().await;
            let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

            let repository = self.repository.clone();
            let handle = tokio::spawn(async move { repository.fetch_dataset(range).await });

            if let Some((previous, abort)) = in_flight.replace((request, handle.abort_handle())) {
                tracing::debug!("Request {} cancels in-flight request {}", request, previous);
                abort.abort();
            }
            (request, handle)
        };

        tracing::info!(
            "Loading dashboard {} .. {} (request {})",
            range.start_date,
            range.end_date,
            request
        );

        let joined = handle.await;

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.as_ref().is_some_and(|(r, _)| *r == request) {
                *in_flight = None;
            }
        }

        let fetched = match joined {
            Ok(fetched) => fetched,
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Request {} was cancelled", request);
                return Ok(LoadOutcome::Superseded { request });
            }
            Err(e) => {
                tracing::error!("Dashboard fetch task for request {} failed: {}", request, e);
                if self.is_stale(request) {
                    return Ok(LoadOutcome::Superseded { request });
                }
                return Err(FetchError::Aborted);
            }
        };

        let mut current = self.current.write().await;
        if self.is_stale(request) {
            tracing::debug!("Dropping stale response for request {}", request);
            return Ok(LoadOutcome::Superseded { request });
        }

        match fetched {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                *current = Some(Loaded {
                    request,
                    dataset: dataset.clone(),
                });
                tracing::info!(
                    "Request {} applied: {} upsells, {} downgrades",
                    request,
                    dataset.upsells.len(),
                    dataset.downgrades.len()
                );
                Ok(LoadOutcome::Applied(dataset))
            }
            Err(e) => {
                tracing::warn!("Request {} failed: {}", request, e);
                Err(e)
            }
        }
    }

    fn is_stale(&self, request: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) != request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{CustomerAccount, Roster};
    use crate::infrastructure::config::MockSettings;
    use crate::infrastructure::mock_repository::MockDashboardRepository;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;

    /// Wraps the generator with per-range latency and failures.
    struct ScriptedRepository {
        inner: MockDashboardRepository,
        slow_end: Option<NaiveDate>,
        failing_end: Option<NaiveDate>,
    }

    #[async_trait]
    impl DashboardRepository for ScriptedRepository {
        async fn fetch_dataset(&self, range: DateRange) -> Result<DashboardDataset, FetchError> {
            if Some(range.end_date) == self.slow_end {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            if Some(range.end_date) == self.failing_end {
                return Err(FetchError::Status {
                    status: 503,
                    body: "backend unavailable".to_string(),
                });
            }
            self.inner.fetch_dataset(range).await
        }

        async fn fetch_account(&self, account_id: &str) -> Result<Option<CustomerAccount>, FetchError> {
            self.inner.fetch_account(account_id).await
        }

        async fn fetch_roster(&self) -> Result<Roster, FetchError> {
            self.inner.fetch_roster().await
        }
    }

    fn month(m: u32) -> DateRange {
        DateRange::for_month(2017, m).unwrap()
    }

    fn session(slow_end: Option<NaiveDate>, failing_end: Option<NaiveDate>) -> DashboardSession {
        let settings = MockSettings {
            delay_ms: 0,
            seed: Some(17),
            ..MockSettings::default()
        };
        DashboardSession::new(Arc::new(ScriptedRepository {
            inner: MockDashboardRepository::new(settings),
            slow_end,
            failing_end,
        }))
    }

    #[tokio::test]
    async fn test_load_applies_dataset() {
        let session = session(None, None);
        assert!(session.dataset().await.is_none());

        let outcome = session.load(month(9)).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Applied(_)));

        let dataset = session.dataset().await.unwrap();
        assert_eq!(dataset.date_range, month(9));
        assert_eq!(session.loaded_request().await, Some(1));
    }

    #[tokio::test]
    async fn test_newer_request_wins() {
        let slow = month(8);
        let fast = month(9);
        let session = session(Some(slow.end_date), None);

        let (first, second) = tokio::join!(session.load(slow), session.load(fast));

        assert!(matches!(first, Ok(LoadOutcome::Superseded { request: 1 })));
        assert!(matches!(second, Ok(LoadOutcome::Applied(_))));

        let dataset = session.dataset().await.unwrap();
        assert_eq!(dataset.date_range, fast);
        assert_eq!(session.loaded_request().await, Some(2));
    }

    #[tokio::test]
    async fn test_finished_fetch_dropped_when_newer_request_issued() {
        let session = Arc::new(session(None, None));

        // Hold the commit lock so the first fetch completes but cannot apply.
        let guard = session.current.write().await;
        let first = tokio::spawn({
            let session = session.clone();
            async move { session.load(month(8)).await }
        });
        while !(session.latest_request.load(Ordering::SeqCst) == 1 && session.in_flight.lock().await.is_none()) {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let session = session.clone();
            async move { session.load(month(9)).await }
        });
        while session.latest_request.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        drop(guard);

        let first = first.await.unwrap();
        let second = second.await.unwrap();
        assert!(matches!(first, Ok(LoadOutcome::Superseded { request: 1 })));
        assert!(matches!(second, Ok(LoadOutcome::Applied(_))));
        assert_eq!(session.dataset().await.unwrap().date_range, month(9));
        assert_eq!(session.loaded_request().await, Some(2));
    }

    #[tokio::test]
    async fn test_sequential_loads_replace_dataset() {
        let session = session(None, None);
        session.load(month(7)).await.unwrap();
        session.load(month(8)).await.unwrap();

        let dataset = session.dataset().await.unwrap();
        assert_eq!(dataset.date_range, month(8));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_dataset() {
        let broken = month(10);
        let session = session(None, Some(broken.end_date));
        session.load(month(9)).await.unwrap();

        let err = session.load(broken).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));

        let dataset = session.dataset().await.unwrap();
        assert_eq!(dataset.date_range, month(9));
        assert_eq!(session.loaded_request().await, Some(1));
    }

    #[tokio::test]
    async fn test_selection_round_trip() {
        let session = session(None, None);
        assert_eq!(session.selection().await, Selection::default());

        let selection = Selection {
            segment: SegmentFilter::Churn,
            customer_id: Some("3".to_string()),
            sales_rep_id: None,
        };
        session.select(selection.clone()).await;
        assert_eq!(session.selection().await, selection);
    }
}
