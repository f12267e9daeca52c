// Dashboard dataset domain model
use super::customer::Customer;
use super::health::{CustomerHealth, HealthRenewalSummary};
use super::metrics::{MetricSummary, PayingCustomers, Segment};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DateRangeError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("a month or both start and end dates are required")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, DateRangeError> {
        if start_date > end_date {
            return Err(DateRangeError::Inverted {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// First through last day of the given calendar month.
    pub fn for_month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth(format!("{:04}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        Self::new(start, end)
    }

    /// Parse a `YYYY-MM` month selection.
    pub fn parse_month(value: &str) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::for_month(year, month).map_err(|_| invalid())
    }

    /// The `days` days ending at `end_date`.
    pub fn trailing_days(end_date: NaiveDate, days: u64) -> Self {
        let start_date = end_date
            .checked_sub_days(chrono::Days::new(days))
            .unwrap_or(end_date);
        Self {
            start_date,
            end_date,
        }
    }

    pub fn end_month(&self) -> NaiveDate {
        self.end_date.with_day(1).unwrap_or(self.end_date)
    }
}

/// ARR movement per segment for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyArrChange {
    pub date: NaiveDate,
    pub new: f64,
    pub upsell: f64,
    pub downgrade: f64,
    pub churn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryArr {
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateArr {
    pub state: String,
    pub value: f64,
}

/// Everything the dashboard renders for one date range. Replaced wholesale on
/// every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDataset {
    pub date_range: DateRange,
    pub paying_customers: PayingCustomers,
    pub new_customers: MetricSummary,
    pub upsell_customers: MetricSummary,
    pub downgrade_customers: MetricSummary,
    pub churn_customers: MetricSummary,
    pub upsells: Vec<Customer>,
    pub downgrades: Vec<Customer>,
    pub arr_changes_by_month: Vec<MonthlyArrChange>,
    pub arr_by_country: Vec<CountryArr>,
    pub arr_by_state: Vec<StateArr>,
    #[serde(default)]
    pub health_renewal: HealthRenewalSummary,
    #[serde(default)]
    pub health_scores: Vec<CustomerHealth>,
}

impl DashboardDataset {
    pub fn segment(&self, segment: Segment) -> &MetricSummary {
        match segment {
            Segment::New => &self.new_customers,
            Segment::Upsell => &self.upsell_customers,
            Segment::Downgrade => &self.downgrade_customers,
            Segment::Churn => &self.churn_customers,
        }
    }
}
