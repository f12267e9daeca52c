// Customer health and renewal domain models
use serde::{Deserialize, Serialize};

/// Health and renewal counts for one reporting period.
///
/// `total` is supplied by the source and is not recomputed from the columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersByTimePeriod {
    pub period: String,
    pub healthy: u32,
    pub neutral: u32,
    pub at_risk: u32,
    pub renewed: u32,
    pub lost: u32,
    pub total: u32,
}

impl CustomersByTimePeriod {
    /// Healthy customers as a fraction of the period total.
    pub fn healthy_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.healthy as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRenewalSummary {
    pub total_customers: u32,
    pub total_customers_trend: f64,
    pub periods: Vec<CustomersByTimePeriod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Neutral,
    #[serde(rename = "At Risk")]
    AtRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenewalUrgency {
    Urgent,
    Soon,
    Later,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    None,
    Warning,
    Critical,
}

/// Health card for a single account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHealth {
    pub id: String,
    pub name: String,
    pub health_score: u8,
    pub previous_health_score: u8,
    pub status: HealthStatus,
    pub csm: String,
    pub issues: u32,
    pub days_to_renewal: i64,
}

impl CustomerHealth {
    pub fn score_change(&self) -> i16 {
        self.health_score as i16 - self.previous_health_score as i16
    }

    pub fn score_band(&self) -> ScoreBand {
        match self.health_score {
            80.. => ScoreBand::Good,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn renewal_urgency(&self) -> RenewalUrgency {
        if self.days_to_renewal < 30 {
            RenewalUrgency::Urgent
        } else if self.days_to_renewal < 90 {
            RenewalUrgency::Soon
        } else {
            RenewalUrgency::Later
        }
    }

    pub fn issue_severity(&self) -> IssueSeverity {
        match self.issues {
            0 => IssueSeverity::None,
            1..=2 => IssueSeverity::Warning,
            _ => IssueSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(score: u8, previous: u8, issues: u32, days: i64) -> CustomerHealth {
        CustomerHealth {
            id: "1".to_string(),
            name: "Acme Corporation".to_string(),
            health_score: score,
            previous_health_score: previous,
            status: HealthStatus::Neutral,
            csm: "Emily Davis".to_string(),
            issues,
            days_to_renewal: days,
        }
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(card(80, 80, 0, 200).score_band(), ScoreBand::Good);
        assert_eq!(card(79, 80, 0, 200).score_band(), ScoreBand::Fair);
        assert_eq!(card(60, 80, 0, 200).score_band(), ScoreBand::Fair);
        assert_eq!(card(59, 80, 0, 200).score_band(), ScoreBand::Poor);
    }

    #[test]
    fn test_score_change_can_drop() {
        assert_eq!(card(62, 75, 0, 200).score_change(), -13);
        assert_eq!(card(90, 85, 0, 200).score_change(), 5);
    }

    #[test]
    fn test_renewal_and_issue_flags() {
        assert_eq!(card(70, 70, 0, 29).renewal_urgency(), RenewalUrgency::Urgent);
        assert_eq!(card(70, 70, 0, 30).renewal_urgency(), RenewalUrgency::Soon);
        assert_eq!(card(70, 70, 0, 90).renewal_urgency(), RenewalUrgency::Later);

        assert_eq!(card(70, 70, 0, 90).issue_severity(), IssueSeverity::None);
        assert_eq!(card(70, 70, 2, 90).issue_severity(), IssueSeverity::Warning);
        assert_eq!(card(70, 70, 3, 90).issue_severity(), IssueSeverity::Critical);
    }

    #[test]
    fn test_healthy_share_of_empty_period() {
        let period = CustomersByTimePeriod {
            period: "Jan".to_string(),
            healthy: 0,
            neutral: 0,
            at_risk: 0,
            renewed: 0,
            lost: 0,
            total: 0,
        };
        assert_eq!(period.healthy_share(), 0.0);
    }
}
