// Segment filter engine - isolates one revenue-movement segment across all views
use super::dashboard::DashboardDataset;
use super::health::{CustomersByTimePeriod, HealthRenewalSummary};
use super::metrics::Segment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentFilter {
    #[default]
    None,
    New,
    Upsell,
    Downgrade,
    Churn,
}

impl SegmentFilter {
    /// Parse a request parameter. Unknown values select no filter.
    pub fn from_param(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return SegmentFilter::None;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => SegmentFilter::New,
            "upsell" => SegmentFilter::Upsell,
            "downgrade" => SegmentFilter::Downgrade,
            "churn" => SegmentFilter::Churn,
            "" | "none" | "all" => SegmentFilter::None,
            other => {
                tracing::debug!("Unrecognized segment filter '{}', showing all segments", other);
                SegmentFilter::None
            }
        }
    }

    pub fn segment(&self) -> Option<Segment> {
        match self {
            SegmentFilter::None => None,
            SegmentFilter::New => Some(Segment::New),
            SegmentFilter::Upsell => Some(Segment::Upsell),
            SegmentFilter::Downgrade => Some(Segment::Downgrade),
            SegmentFilter::Churn => Some(Segment::Churn),
        }
    }

    pub fn is_active(&self) -> bool {
        *self != SegmentFilter::None
    }

    pub fn keeps_upsells(&self) -> bool {
        matches!(self, SegmentFilter::None | SegmentFilter::Upsell)
    }

    pub fn keeps_downgrades(&self) -> bool {
        matches!(self, SegmentFilter::None | SegmentFilter::Downgrade)
    }
}

/// A dataset narrowed to one segment, tagged with the filter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub filter: SegmentFilter,
    #[serde(flatten)]
    pub data: DashboardDataset,
}

/// Derive the view for `filter`.
///
/// Only the upsell and downgrade lists have per-customer rows, so `New` and
/// `Churn` can only suppress both lists. Monthly series, geographic
/// breakdowns, segment summaries and health cards pass through unchanged.
/// Health/renewal rows are zeroed per [`filter_time_periods`].
pub fn apply_filter(dataset: &DashboardDataset, filter: SegmentFilter) -> FilteredView {
    let upsells = if filter.keeps_upsells() {
        dataset.upsells.clone()
    } else {
        Vec::new()
    };
    let downgrades = if filter.keeps_downgrades() {
        dataset.downgrades.clone()
    } else {
        Vec::new()
    };

    let health_renewal = HealthRenewalSummary {
        total_customers: dataset.health_renewal.total_customers,
        total_customers_trend: dataset.health_renewal.total_customers_trend,
        periods: filter_time_periods(&dataset.health_renewal.periods, filter),
    };

    FilteredView {
        filter,
        data: DashboardDataset {
            date_range: dataset.date_range,
            paying_customers: dataset.paying_customers.clone(),
            new_customers: dataset.new_customers.clone(),
            upsell_customers: dataset.upsell_customers.clone(),
            downgrade_customers: dataset.downgrade_customers.clone(),
            churn_customers: dataset.churn_customers.clone(),
            upsells,
            downgrades,
            arr_changes_by_month: dataset.arr_changes_by_month.clone(),
            arr_by_country: dataset.arr_by_country.clone(),
            arr_by_state: dataset.arr_by_state.clone(),
            health_renewal,
            health_scores: dataset.health_scores.clone(),
        },
    }
}

/// Zero every health/renewal column except the one tied to the filter's
/// segment. `renewed` survives for New and Upsell. `total` is left as is.
pub fn filter_time_periods(
    periods: &[CustomersByTimePeriod],
    filter: SegmentFilter,
) -> Vec<CustomersByTimePeriod> {
    if !filter.is_active() {
        return periods.to_vec();
    }

    let keep = |wanted: bool, value: u32| if wanted { value } else { 0 };

    periods
        .iter()
        .map(|p| CustomersByTimePeriod {
            period: p.period.clone(),
            healthy: keep(filter == SegmentFilter::New, p.healthy),
            neutral: keep(filter == SegmentFilter::Upsell, p.neutral),
            at_risk: keep(filter == SegmentFilter::Downgrade, p.at_risk),
            renewed: keep(
                matches!(filter, SegmentFilter::New | SegmentFilter::Upsell),
                p.renewed,
            ),
            lost: keep(filter == SegmentFilter::Churn, p.lost),
            total: p.total,
        })
        .collect()
}
