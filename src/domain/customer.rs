// Customer domain model
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The market whose customers also carry a state.
pub const DOMESTIC_MARKET: &str = "United States";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignupType {
    SaaS,
    Enterprise,
    #[serde(rename = "SMB")]
    Smb,
}

impl SignupType {
    pub const ALL: [SignupType; 3] = [SignupType::SaaS, SignupType::Enterprise, SignupType::Smb];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub contract_length: u32,
    pub mrr: f64,
    pub arr: f64,
    pub signup_type: SignupType,
    pub delta: f64,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Customer {
    /// Build a customer whose ARR is derived from MRR. The state is only kept
    /// for customers in the domestic market.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        name: String,
        start_date: NaiveDate,
        contract_length: u32,
        mrr: f64,
        signup_type: SignupType,
        delta: f64,
        country: String,
        state: Option<String>,
    ) -> Self {
        let state = if country == DOMESTIC_MARKET { state } else { None };
        Self {
            id,
            name,
            start_date,
            end_date: None,
            contract_length,
            mrr,
            arr: mrr * 12.0,
            signup_type,
            delta,
            country,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_arr_is_derived_from_mrr() {
        let customer = Customer::new(
            "UP1000".to_string(),
            "Customer 1000".to_string(),
            date(2017, 8, 1),
            12,
            1500.0,
            SignupType::SaaS,
            250.0,
            "Canada".to_string(),
            None,
        );
        assert_eq!(customer.arr, 18000.0);
        assert_eq!(customer.end_date, None);
    }

    #[test]
    fn test_state_dropped_outside_domestic_market() {
        let customer = Customer::new(
            "DOWN2000".to_string(),
            "Customer 2000".to_string(),
            date(2017, 3, 10),
            6,
            400.0,
            SignupType::Smb,
            -120.0,
            "Germany".to_string(),
            Some("Texas".to_string()),
        );
        assert_eq!(customer.state, None);

        let customer = Customer::new(
            "DOWN2001".to_string(),
            "Customer 2001".to_string(),
            date(2017, 3, 10),
            6,
            400.0,
            SignupType::Enterprise,
            -120.0,
            DOMESTIC_MARKET.to_string(),
            Some("Texas".to_string()),
        );
        assert_eq!(customer.state.as_deref(), Some("Texas"));
    }

    #[test]
    fn test_signup_type_wire_names() {
        let json = serde_json::to_string(&SignupType::ALL).unwrap();
        assert_eq!(json, r#"["SaaS","Enterprise","SMB"]"#);
    }
}
