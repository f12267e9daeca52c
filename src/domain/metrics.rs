// Segment metric domain models
use serde::{Deserialize, Serialize};

/// Revenue-movement category a customer falls into for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    New,
    Upsell,
    Downgrade,
    Churn,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::New,
        Segment::Upsell,
        Segment::Downgrade,
        Segment::Churn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Segment::New => "New",
            Segment::Upsell => "Upsell",
            Segment::Downgrade => "Downgrade",
            Segment::Churn => "Churn",
        }
    }

    /// Chart color used for this segment's slice and card.
    pub fn color(&self) -> &'static str {
        match self {
            Segment::New => "#22c55e",
            Segment::Upsell => "#3b82f6",
            Segment::Downgrade => "#f97316",
            Segment::Churn => "#ef4444",
        }
    }
}

/// Aggregate counters for one segment.
///
/// `mrr_value` and `arr_value` are supplied independently by the data source
/// and are not kept in the `arr == mrr * 12` relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub count: u32,
    pub mrr_change: f64,
    pub mrr_value: f64,
    pub arr_value: f64,
    pub label: String,
    pub trend: f64,
}

impl MetricSummary {
    pub fn new(count: u32, mrr_change: f64, mrr_value: f64, arr_value: f64, label: String, trend: f64) -> Self {
        Self {
            count,
            mrr_change,
            mrr_value,
            arr_value,
            label,
            trend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayingCustomers {
    pub count: u32,
    pub trend: f64,
}
