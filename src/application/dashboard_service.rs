// Dashboard service - Use cases for building dashboard views
use crate::application::dashboard_repository::FetchError;
use crate::application::dashboard_session::{DashboardSession, LoadOutcome, Selection};
use crate::domain::account::{CustomerAccount, Roster, RosterEntry};
use crate::domain::dashboard::{DashboardDataset, DateRange, DateRangeError};
use crate::domain::format::{
    format_currency, format_date, format_number, format_percentage, percentage_change, trend_class, trend_symbol,
};
use crate::domain::health::{CustomerHealth, CustomersByTimePeriod, IssueSeverity, RenewalUrgency, ScoreBand};
use crate::domain::metrics::{MetricSummary, Segment};
use crate::domain::segment_filter::{FilteredView, SegmentFilter, apply_filter, filter_time_periods};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

const ALL_CUSTOMERS: &str = "All Customers";
const ALL_SALES_REPS: &str = "All Sales Reps";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no dashboard data has been loaded yet")]
    NotLoaded,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("account '{0}' not found")]
    AccountNotFound(String),
    #[error("invalid date range: {0}")]
    InvalidDateRange(#[from] DateRangeError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub segment: Segment,
    pub count: u32,
    pub label: String,
    pub mrr_change: String,
    pub mrr_value: String,
    pub arr_value: String,
    pub trend_symbol: &'static str,
    pub trend_class: &'static str,
}

impl MetricCard {
    fn from_summary(segment: Segment, summary: &MetricSummary) -> Self {
        Self {
            segment,
            count: summary.count,
            label: summary.label.clone(),
            mrr_change: format_percentage(summary.mrr_change, 2),
            mrr_value: format_currency(summary.mrr_value, 0),
            arr_value: format_currency(summary.arr_value, 0),
            trend_symbol: trend_symbol(summary.mrr_change),
            trend_class: trend_class(summary.mrr_change),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayingCustomersCard {
    pub count: String,
    pub trend: String,
    pub trend_symbol: &'static str,
    pub trend_class: &'static str,
}

/// Human-readable names for the active selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLabels {
    pub segment: Option<&'static str>,
    pub customer: String,
    pub sales_rep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub view: FilteredView,
    pub paying_customers: PayingCustomersCard,
    pub cards: Vec<MetricCard>,
    pub selection: SelectionLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodHealth {
    #[serde(flatten)]
    pub counts: CustomersByTimePeriod,
    pub healthy_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRenewalView {
    pub filter: SegmentFilter,
    pub caption: String,
    pub total_customers: u32,
    pub total_customers_trend: f64,
    pub periods: Vec<PeriodHealth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreCard {
    #[serde(flatten)]
    pub health: CustomerHealth,
    pub score_change: i16,
    pub score_change_pct: String,
    pub band: ScoreBand,
    pub urgency: RenewalUrgency,
    pub severity: IssueSeverity,
}

impl HealthScoreCard {
    fn from_health(health: &CustomerHealth) -> Self {
        let change = percentage_change(health.health_score as f64, health.previous_health_score as f64);
        Self {
            health: health.clone(),
            score_change: health.score_change(),
            score_change_pct: format_percentage(change, 1),
            band: health.score_band(),
            urgency: health.renewal_urgency(),
            severity: health.issue_severity(),
        }
    }
}

/// Account record plus the figures the detail page headlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    #[serde(flatten)]
    pub account: CustomerAccount,
    pub renewal_date_label: String,
    pub days_to_renewal: i64,
    pub open_tickets: usize,
    pub active_escalations: usize,
}

impl AccountDetails {
    fn new(account: CustomerAccount, today: NaiveDate) -> Self {
        Self {
            renewal_date_label: format_date(account.renewal_date),
            days_to_renewal: account.days_to_renewal(today),
            open_tickets: account.open_tickets(),
            active_escalations: account.active_escalations(),
            account,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLevel {
    Country,
    State,
}

impl GeoLevel {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "country" => Some(GeoLevel::Country),
            "state" => Some(GeoLevel::State),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMap {
    pub title: &'static str,
    pub values: BTreeMap<String, f64>,
    pub max_value: f64,
}

#[derive(Clone)]
pub struct DashboardService {
    session: Arc<DashboardSession>,
}

impl DashboardService {
    pub fn new(session: Arc<DashboardSession>) -> Self {
        Self { session }
    }

    async fn current(&self) -> Result<Arc<DashboardDataset>, DashboardError> {
        self.session.dataset().await.ok_or(DashboardError::NotLoaded)
    }

    /// Segment to use when a request does not name one.
    pub async fn selected_segment(&self) -> SegmentFilter {
        self.session.selection().await.segment
    }

    pub async fn change_date_range(&self, range: DateRange) -> Result<LoadOutcome, DashboardError> {
        Ok(self.session.load(range).await?)
    }

    /// Roster used only for display names. An unavailable roster falls back
    /// to the "All ..." labels instead of failing the view.
    async fn label_roster(&self) -> Roster {
        match self.session.repository().fetch_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!("Roster unavailable, using default selection labels: {}", e);
                Roster::default()
            }
        }
    }

    pub async fn select(&self, selection: Selection) -> Result<SelectionLabels, DashboardError> {
        let roster = self.label_roster().await;
        let labels = selection_labels(&selection, &roster);
        self.session.select(selection).await;
        Ok(labels)
    }

    pub async fn overview(&self, filter: SegmentFilter) -> Result<DashboardOverview, DashboardError> {
        let dataset = self.current().await?;
        let selection = Selection {
            segment: filter,
            ..self.session.selection().await
        };
        let roster = self.label_roster().await;

        let cards = Segment::ALL
            .iter()
            .map(|s| MetricCard::from_summary(*s, dataset.segment(*s)))
            .collect();
        let paying = &dataset.paying_customers;

        Ok(DashboardOverview {
            view: apply_filter(&dataset, filter),
            paying_customers: PayingCustomersCard {
                count: format_number(paying.count as f64),
                trend: format_percentage(paying.trend, 2),
                trend_symbol: trend_symbol(paying.trend),
                trend_class: trend_class(paying.trend),
            },
            cards,
            selection: selection_labels(&selection, &roster),
        })
    }

    pub async fn health_renewal(&self, filter: SegmentFilter) -> Result<HealthRenewalView, DashboardError> {
        let dataset = self.current().await?;
        let summary = &dataset.health_renewal;

        let caption = match filter.segment() {
            Some(segment) => format!("Filtered by {} customer segment", segment.label()),
            None => "All customer segments".to_string(),
        };

        // Shares come from the unfiltered rows so they stay comparable across filters
        let periods = filter_time_periods(&summary.periods, filter)
            .into_iter()
            .zip(summary.periods.iter())
            .map(|(counts, original)| PeriodHealth {
                counts,
                healthy_share: original.healthy_share(),
            })
            .collect();

        Ok(HealthRenewalView {
            filter,
            caption,
            total_customers: summary.total_customers,
            total_customers_trend: summary.total_customers_trend,
            periods,
        })
    }

    /// Per-account health cards, lowest score first.
    pub async fn health_scores(&self) -> Result<Vec<HealthScoreCard>, DashboardError> {
        let dataset = self.current().await?;
        let mut cards: Vec<HealthScoreCard> = dataset.health_scores.iter().map(HealthScoreCard::from_health).collect();
        cards.sort_by_key(|c| c.health.health_score);
        Ok(cards)
    }

    pub async fn distribution(&self) -> Result<Vec<DistributionSlice>, DashboardError> {
        let dataset = self.current().await?;
        Ok(segment_distribution(&dataset))
    }

    pub async fn geo_map(&self, level: GeoLevel) -> Result<GeoMap, DashboardError> {
        let dataset = self.current().await?;
        let (title, values): (&'static str, BTreeMap<String, f64>) = match level {
            GeoLevel::Country => (
                "ARR by Country",
                dataset
                    .arr_by_country
                    .iter()
                    .map(|c| (c.country.clone(), c.value))
                    .collect(),
            ),
            GeoLevel::State => (
                "ARR by US State",
                dataset
                    .arr_by_state
                    .iter()
                    .map(|s| (s.state.clone(), s.value))
                    .collect(),
            ),
        };
        let max_value = values.values().copied().fold(0.0, f64::max);

        Ok(GeoMap {
            title,
            values,
            max_value,
        })
    }

    pub async fn account(&self, account_id: &str, today: NaiveDate) -> Result<AccountDetails, DashboardError> {
        let account = self
            .session
            .repository()
            .fetch_account(account_id)
            .await?
            .ok_or_else(|| DashboardError::AccountNotFound(account_id.to_string()))?;
        Ok(AccountDetails::new(account, today))
    }

    pub async fn customers(&self) -> Result<Vec<RosterEntry>, DashboardError> {
        Ok(self.session.repository().fetch_roster().await?.customers)
    }

    pub async fn sales_reps(&self) -> Result<Vec<RosterEntry>, DashboardError> {
        Ok(self.session.repository().fetch_roster().await?.sales_reps)
    }
}

fn selection_labels(selection: &Selection, roster: &Roster) -> SelectionLabels {
    let customer = selection
        .customer_id
        .as_deref()
        .and_then(|id| roster.customer_name(id))
        .unwrap_or(ALL_CUSTOMERS);
    let sales_rep = selection
        .sales_rep_id
        .as_deref()
        .and_then(|id| roster.sales_rep_name(id))
        .unwrap_or(ALL_SALES_REPS);

    SelectionLabels {
        segment: selection.segment.segment().map(|s| s.label()),
        customer: customer.to_string(),
        sales_rep: sales_rep.to_string(),
    }
}

/// ARR split across the four segments for the distribution chart.
fn segment_distribution(dataset: &DashboardDataset) -> Vec<DistributionSlice> {
    let total: f64 = Segment::ALL.iter().map(|s| dataset.segment(*s).arr_value).sum();

    Segment::ALL
        .iter()
        .map(|s| {
            let value = dataset.segment(*s).arr_value;
            DistributionSlice {
                name: s.label(),
                value,
                color: s.color(),
                share: if total == 0.0 { 0.0 } else { value / total },
            }
        })
        .collect()
}
