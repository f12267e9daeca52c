// Customer account detail domain models
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub status: String,
    pub version: String,
    pub usage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub created: NaiveDate,
    pub updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escalation {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub status: String,
    pub owner: String,
    pub created: NaiveDate,
    pub updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsers {
    pub total: u32,
    pub active: u32,
    pub percent_active: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    pub progress: u8,
    pub remaining_tasks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetrics {
    pub health_score: u8,
    pub csat: u8,
    pub nps: i8,
    /// Days from contract signature to first value.
    pub time_to_value: u32,
    pub active_users: ActiveUsers,
    pub implementation: Implementation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub segment: String,
    pub website: String,
    pub renewal_date: NaiveDate,
    pub account_team: Vec<AccountTeamMember>,
    pub products: Vec<Product>,
    pub support_tickets: Vec<SupportTicket>,
    pub escalations: Vec<Escalation>,
    pub metrics: AccountMetrics,
}

impl CustomerAccount {
    /// Whole days from `today` until renewal; negative once it has lapsed.
    pub fn days_to_renewal(&self, today: NaiveDate) -> i64 {
        (self.renewal_date - today).num_days()
    }

    pub fn open_tickets(&self) -> usize {
        self.support_tickets
            .iter()
            .filter(|t| !t.status.eq_ignore_ascii_case("resolved"))
            .count()
    }

    pub fn active_escalations(&self) -> usize {
        self.escalations
            .iter()
            .filter(|e| e.status.eq_ignore_ascii_case("active"))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// People a dashboard can be narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub customers: Vec<RosterEntry>,
    pub sales_reps: Vec<RosterEntry>,
}

impl Roster {
    pub fn customer_name(&self, id: &str) -> Option<&str> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn sales_rep_name(&self, id: &str) -> Option<&str> {
        self.sales_reps
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }
}
