// Mock repository - Generates sample dashboards in place of a backend
use crate::application::dashboard_repository::{DashboardRepository, FetchError};
use crate::domain::account::{
    AccountMetrics, AccountTeamMember, ActiveUsers, CustomerAccount, Escalation, Implementation,
    Product, Roster, RosterEntry, SupportTicket,
};
use crate::domain::customer::{Customer, DOMESTIC_MARKET, SignupType};
use crate::domain::dashboard::{CountryArr, DashboardDataset, DateRange, MonthlyArrChange, StateArr};
use crate::domain::health::{CustomerHealth, CustomersByTimePeriod, HealthRenewalSummary, HealthStatus};
use crate::domain::metrics::{MetricSummary, PayingCustomers};
use crate::domain::weighted::{WeightedItem, pick_weighted};
use crate::infrastructure::config::MockSettings;
use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const COUNTRIES: [WeightedItem<&str>; 10] = [
    WeightedItem::new(DOMESTIC_MARKET, 50.0),
    WeightedItem::new("Canada", 10.0),
    WeightedItem::new("United Kingdom", 8.0),
    WeightedItem::new("Germany", 6.0),
    WeightedItem::new("France", 5.0),
    WeightedItem::new("Australia", 5.0),
    WeightedItem::new("Brazil", 4.0),
    WeightedItem::new("Japan", 4.0),
    WeightedItem::new("India", 3.0),
    WeightedItem::new("Other", 5.0),
];

const US_STATES: [WeightedItem<&str>; 11] = [
    WeightedItem::new("California", 20.0),
    WeightedItem::new("New York", 15.0),
    WeightedItem::new("Texas", 12.0),
    WeightedItem::new("Florida", 10.0),
    WeightedItem::new("Illinois", 8.0),
    WeightedItem::new("Massachusetts", 7.0),
    WeightedItem::new("Washington", 6.0),
    WeightedItem::new("Colorado", 5.0),
    WeightedItem::new("Georgia", 4.0),
    WeightedItem::new("New Jersey", 4.0),
    WeightedItem::new("Other", 9.0),
];

// Segment totals: (count, mrr change, mrr, arr, trend)
const NEW_TOTALS: (u32, f64, f64, f64, f64) = (102, 0.3519, 350021.63, 4200259.56, 0.17);
const UPSELL_TOTALS: (u32, f64, f64, f64, f64) = (44, 0.2270, 128762.13, 1545145.56, 0.08);
const DOWNGRADE_TOTALS: (u32, f64, f64, f64, f64) = (35, -0.0866, 47232.04, 566784.48, -0.03);
const CHURN_TOTALS: (u32, f64, f64, f64, f64) = (27, -0.1993, 61207.67, 734492.04, -0.05);

const PAYING_CUSTOMERS: u32 = 812;
const PAYING_CUSTOMERS_TREND: f64 = 0.3533;

/// Share of ARR attributed to the domestic market in the state breakdown.
const DOMESTIC_ARR_SHARE: f64 = 0.6;

const HEALTH_PERIODS: u32 = 6;

const CUSTOMERS: [(&str, &str); 10] = [
    ("1", "Acme Corporation"),
    ("2", "TechNova Solutions"),
    ("3", "Global Enterprises"),
    ("4", "Future Innovations"),
    ("5", "Quantum Systems"),
    ("6", "Pinnacle Group"),
    ("7", "Horizon Technology"),
    ("8", "Summit Partners"),
    ("9", "Nexus Industries"),
    ("10", "Vertex Networks"),
];

const SALES_REPS: [(&str, &str); 8] = [
    ("1", "John Smith"),
    ("2", "Sarah Johnson"),
    ("3", "Michael Brown"),
    ("4", "Emily Davis"),
    ("5", "David Wilson"),
    ("6", "Jessica Taylor"),
    ("7", "Robert Martinez"),
    ("8", "Lisa Anderson"),
];

#[derive(Debug, Clone)]
pub struct MockDashboardRepository {
    settings: MockSettings,
}

impl MockDashboardRepository {
    pub fn new(settings: MockSettings) -> Self {
        Self { settings }
    }

    fn rng(&self) -> StdRng {
        match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    async fn simulate_latency(&self) {
        if self.settings.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.delay_ms)).await;
        }
    }

    /// Build a complete sample dataset for `range`.
    pub fn generate<R: Rng + ?Sized>(&self, range: DateRange, rng: &mut R) -> DashboardDataset {
        let upsells = (0..self.settings.upsell_count)
            .map(|i| {
                let mrr = f64::from(rng.gen_range(500..5500_u32));
                let started = days_before(range.start_date, rng.gen_range(0..30));
                let contract = rng.gen_range(6..30);
                let delta = f64::from(rng.gen_range(100..2100_u32));
                customer(rng, format!("UP{}", 1000 + i), started, contract, mrr, delta)
            })
            .collect();

        let downgrades = (0..self.settings.downgrade_count)
            .map(|i| {
                let mrr = f64::from(rng.gen_range(200..3200_u32));
                let started = days_before(range.start_date, rng.gen_range(0..180));
                let contract = rng.gen_range(3..15);
                let delta = -f64::from(rng.gen_range(100..1100_u32));
                customer(rng, format!("DOWN{}", 2000 + i), started, contract, mrr, delta)
            })
            .collect();

        let arr_changes_by_month = month_starts(range, self.settings.months)
            .into_iter()
            .map(|date| MonthlyArrChange {
                date,
                new: rng.r#gen::<f64>() * 100000.0 + 20000.0,
                upsell: rng.r#gen::<f64>() * 50000.0 + 10000.0,
                downgrade: -(rng.r#gen::<f64>() * 25000.0 + 5000.0),
                churn: -(rng.r#gen::<f64>() * 30000.0 + 8000.0),
            })
            .collect();

        let growth_arr = NEW_TOTALS.3 + UPSELL_TOTALS.3;
        let arr_by_country = COUNTRIES
            .iter()
            .map(|c| CountryArr {
                country: c.value.to_string(),
                value: c.weight / 100.0 * growth_arr,
            })
            .collect();
        let arr_by_state = US_STATES
            .iter()
            .map(|s| StateArr {
                state: s.value.to_string(),
                value: s.weight / 100.0 * growth_arr * DOMESTIC_ARR_SHARE,
            })
            .collect();

        DashboardDataset {
            date_range: range,
            paying_customers: PayingCustomers {
                count: PAYING_CUSTOMERS,
                trend: PAYING_CUSTOMERS_TREND,
            },
            new_customers: summary(NEW_TOTALS, "New"),
            upsell_customers: summary(UPSELL_TOTALS, "Upsell"),
            downgrade_customers: summary(DOWNGRADE_TOTALS, "Downgrade"),
            churn_customers: summary(CHURN_TOTALS, "Churn"),
            upsells,
            downgrades,
            arr_changes_by_month,
            arr_by_country,
            arr_by_state,
            health_renewal: health_renewal(range, rng),
            health_scores: health_scores(rng),
        }
    }
}

#[async_trait]
impl DashboardRepository for MockDashboardRepository {
    async fn fetch_dataset(&self, range: DateRange) -> Result<DashboardDataset, FetchError> {
        let dataset = {
            let mut rng = self.rng();
            self.generate(range, &mut rng)
        };
        self.simulate_latency().await;
        Ok(dataset)
    }

    async fn fetch_account(&self, account_id: &str) -> Result<Option<CustomerAccount>, FetchError> {
        self.simulate_latency().await;
        Ok(CUSTOMERS
            .iter()
            .find(|(id, _)| *id == account_id)
            .map(|(id, name)| account(id, name)))
    }

    async fn fetch_roster(&self) -> Result<Roster, FetchError> {
        Ok(Roster {
            customers: roster_entries(&CUSTOMERS),
            sales_reps: roster_entries(&SALES_REPS),
        })
    }
}

fn customer<R: Rng + ?Sized>(
    rng: &mut R,
    id: String,
    start_date: NaiveDate,
    contract_length: u32,
    mrr: f64,
    delta: f64,
) -> Customer {
    let country = pick_weighted(&COUNTRIES, rng).copied().unwrap_or("Other");
    let state = if country == DOMESTIC_MARKET {
        pick_weighted(&US_STATES, rng).map(|s| s.to_string())
    } else {
        None
    };
    let signup_type = SignupType::ALL[rng.gen_range(0..SignupType::ALL.len())];
    let name = format!("Customer {}", id.trim_start_matches(char::is_alphabetic));

    Customer::new(
        id,
        name,
        start_date,
        contract_length,
        mrr,
        signup_type,
        delta,
        country.to_string(),
        state,
    )
}

fn summary(totals: (u32, f64, f64, f64, f64), label: &str) -> MetricSummary {
    let (count, mrr_change, mrr_value, arr_value, trend) = totals;
    MetricSummary::new(count, mrr_change, mrr_value, arr_value, label.to_string(), trend)
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

/// First day of each of the `count` months ending with the range's last month.
fn month_starts(range: DateRange, count: u32) -> Vec<NaiveDate> {
    let last = range.end_month();
    (0..count)
        .rev()
        .filter_map(|back| last.checked_sub_months(Months::new(back)))
        .collect()
}

fn health_renewal<R: Rng + ?Sized>(range: DateRange, rng: &mut R) -> HealthRenewalSummary {
    let periods = month_starts(range, HEALTH_PERIODS)
        .into_iter()
        .map(|month| {
            let healthy = rng.gen_range(380..=520);
            let neutral = rng.gen_range(150..=250);
            let at_risk = rng.gen_range(60..=120);
            CustomersByTimePeriod {
                period: month.format("%b %Y").to_string(),
                healthy,
                neutral,
                at_risk,
                renewed: rng.gen_range(120..=200),
                lost: rng.gen_range(20..=50),
                total: healthy + neutral + at_risk,
            }
        })
        .collect();

    HealthRenewalSummary {
        total_customers: PAYING_CUSTOMERS,
        total_customers_trend: PAYING_CUSTOMERS_TREND,
        periods,
    }
}

fn health_scores<R: Rng + ?Sized>(rng: &mut R) -> Vec<CustomerHealth> {
    CUSTOMERS
        .iter()
        .map(|(id, name)| {
            let score: u8 = rng.gen_range(40..=98);
            let previous = score.saturating_add(rng.gen_range(0..=10)).saturating_sub(rng.gen_range(0..=10)).min(100);
            let status = match score {
                80.. => HealthStatus::Healthy,
                60..=79 => HealthStatus::Neutral,
                _ => HealthStatus::AtRisk,
            };
            let csm = SALES_REPS[rng.gen_range(0..SALES_REPS.len())].1;
            CustomerHealth {
                id: id.to_string(),
                name: name.to_string(),
                health_score: score,
                previous_health_score: previous,
                status,
                csm: csm.to_string(),
                issues: rng.gen_range(0..=5),
                days_to_renewal: rng.gen_range(5..=365),
            }
        })
        .collect()
}

fn roster_entries(entries: &[(&str, &str)]) -> Vec<RosterEntry> {
    entries
        .iter()
        .map(|(id, name)| RosterEntry {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// `Acme Corporation` → `www.acme.com`.
fn website(name: &str) -> String {
    let domain: String = name
        .split_whitespace()
        .next()
        .unwrap_or(name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!("www.{}.com", domain.to_ascii_lowercase())
}

fn account(id: &str, name: &str) -> CustomerAccount {
    let member = |id: &str, name: &str, role: &str, email: &str, phone: &str| AccountTeamMember {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    };
    let product = |id: &str, name: &str, status: &str, version: &str, usage: u8| Product {
        id: id.to_string(),
        name: name.to_string(),
        status: status.to_string(),
        version: version.to_string(),
        usage,
    };
    let ticket = |id: &str, title: &str, priority: &str, status: &str, created: NaiveDate, updated: NaiveDate| {
        SupportTicket {
            id: id.to_string(),
            title: title.to_string(),
            priority: priority.to_string(),
            status: status.to_string(),
            created,
            updated,
        }
    };

    CustomerAccount {
        id: id.to_string(),
        name: name.to_string(),
        industry: "Technology".to_string(),
        segment: "Enterprise".to_string(),
        website: website(name),
        renewal_date: ymd(2024, 12, 15),
        account_team: vec![
            member("1", "John Smith", "Account Executive", "john.smith@company.com", "+1 (555) 123-4567"),
            member("2", "Emily Davis", "Customer Success Manager", "emily.davis@company.com", "+1 (555) 987-6543"),
            member("3", "Michael Johnson", "Technical Account Manager", "michael.johnson@company.com", "+1 (555) 456-7890"),
            member("4", "Sarah Wilson", "Solutions Architect", "sarah.wilson@company.com", "+1 (555) 234-5678"),
        ],
        products: vec![
            product("1", "Analytics Platform", "Active", "3.2.1", 87),
            product("2", "Reporting Suite", "Active", "2.0.4", 65),
            product("3", "Integration API", "Active", "1.5.0", 92),
            product("4", "Mobile App", "Inactive", "1.0.0", 0),
        ],
        support_tickets: vec![
            ticket("T-1001", "API Integration Issue", "High", "Open", ymd(2023, 6, 10), ymd(2023, 6, 12)),
            ticket("T-982", "Dashboard Loading Slow", "Medium", "In Progress", ymd(2023, 6, 5), ymd(2023, 6, 11)),
            ticket("T-975", "User Permission Error", "Low", "Resolved", ymd(2023, 5, 28), ymd(2023, 6, 2)),
        ],
        escalations: vec![
            Escalation {
                id: "E-342".to_string(),
                title: "Data Migration Delay".to_string(),
                severity: "Medium".to_string(),
                status: "Active".to_string(),
                owner: "Michael Johnson".to_string(),
                created: ymd(2023, 6, 1),
                updated: ymd(2023, 6, 10),
            },
            Escalation {
                id: "E-329".to_string(),
                title: "SLA Breach - API Downtime".to_string(),
                severity: "High".to_string(),
                status: "Resolved".to_string(),
                owner: "Emily Davis".to_string(),
                created: ymd(2023, 5, 15),
                updated: ymd(2023, 5, 20),
            },
        ],
        metrics: AccountMetrics {
            health_score: 78,
            csat: 92,
            nps: 68,
            time_to_value: 45,
            active_users: ActiveUsers {
                total: 120,
                active: 98,
                percent_active: 82,
            },
            implementation: Implementation {
                progress: 94,
                remaining_tasks: 2,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> MockDashboardRepository {
        MockDashboardRepository::new(MockSettings {
            delay_ms: 0,
            seed: Some(42),
            ..MockSettings::default()
        })
    }

    fn september() -> DateRange {
        DateRange::new(ymd(2017, 8, 29), ymd(2017, 9, 26)).unwrap()
    }

    #[test]
    fn test_generated_customers_are_consistent() {
        let repo = repository();
        let mut rng = StdRng::seed_from_u64(1);
        let data = repo.generate(september(), &mut rng);

        assert_eq!(data.upsells.len(), 44);
        assert_eq!(data.downgrades.len(), 35);

        for c in data.upsells.iter().chain(data.downgrades.iter()) {
            assert_eq!(c.arr, c.mrr * 12.0);
            assert_eq!(c.state.is_some(), c.country == DOMESTIC_MARKET, "{}", c.id);
        }
        assert!(data.upsells.iter().all(|c| c.delta >= 100.0 && c.delta < 2100.0));
        assert!(data.downgrades.iter().all(|c| c.delta <= -100.0 && c.delta > -1100.0));
        assert!(data.upsells.iter().all(|c| c.start_date <= september().start_date));

        assert_eq!(data.upsells[0].id, "UP1000");
        assert_eq!(data.upsells[0].name, "Customer 1000");
        assert_eq!(data.downgrades[34].id, "DOWN2034");
    }

    #[test]
    fn test_series_ends_at_range_month() {
        let repo = repository();
        let mut rng = StdRng::seed_from_u64(1);
        let data = repo.generate(september(), &mut rng);

        assert_eq!(data.arr_changes_by_month.len(), 24);
        assert_eq!(data.arr_changes_by_month[23].date, ymd(2017, 9, 1));
        assert_eq!(data.arr_changes_by_month[0].date, ymd(2015, 10, 1));
        for month in &data.arr_changes_by_month {
            assert!(month.new >= 20000.0 && month.upsell >= 10000.0);
            assert!(month.downgrade < 0.0 && month.churn < 0.0);
        }

        let periods = &data.health_renewal.periods;
        assert_eq!(periods.len(), 6);
        assert_eq!(periods[5].period, "Sep 2017");
        assert!(periods.iter().all(|p| p.total == p.healthy + p.neutral + p.at_risk));
    }

    #[test]
    fn test_geographic_breakdowns() {
        let repo = repository();
        let mut rng = StdRng::seed_from_u64(1);
        let data = repo.generate(september(), &mut rng);

        let us = &data.arr_by_country[0];
        assert_eq!(us.country, "United States");
        assert!((us.value - 0.5 * (4200259.56 + 1545145.56)).abs() < 1e-6);

        let total_state_share: f64 = data.arr_by_state.iter().map(|s| s.value).sum();
        assert!((total_state_share - 0.6 * (4200259.56 + 1545145.56)).abs() < 1e-3);
    }

    #[test]
    fn test_segment_totals_are_fixed() {
        let repo = repository();
        let mut rng = StdRng::seed_from_u64(1);
        let data = repo.generate(september(), &mut rng);

        assert_eq!(data.paying_customers.count, 812);
        assert_eq!(data.new_customers.count, 102);
        assert_eq!(data.churn_customers.arr_value, 734492.04);
        assert_eq!(data.downgrade_customers.label, "Downgrade");
        assert_eq!(data.date_range, september());
    }

    #[tokio::test]
    async fn test_seeded_fetch_is_reproducible() {
        let repo = repository();
        let first = repo.fetch_dataset(september()).await.unwrap();
        let second = repo.fetch_dataset(september()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_account_lookup() {
        let repo = repository();
        let account = repo.fetch_account("2").await.unwrap().unwrap();
        assert_eq!(account.name, "TechNova Solutions");
        assert_eq!(account.website, "www.technova.com");
        assert_eq!(repo.fetch_account("1").await.unwrap().unwrap().website, "www.acme.com");
        assert_eq!(account.products.len(), 4);
        assert!(repo.fetch_account("42").await.unwrap().is_none());

        let roster = repo.fetch_roster().await.unwrap();
        assert_eq!(roster.customers.len(), 10);
        assert_eq!(roster.sales_reps.len(), 8);
    }
}
