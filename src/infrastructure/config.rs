use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data_source: DataSourceKind,
    #[serde(default)]
    pub mock: MockSettings,
    pub backend: Option<BackendSettings>,
    pub initial_range: Option<InitialRange>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Mock,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MockSettings {
    /// Artificial latency per dataset fetch, in milliseconds
    pub delay_ms: u64,
    /// Fixed seed for reproducible datasets
    pub seed: Option<u64>,
    pub upsell_count: usize,
    pub downgrade_count: usize,
    pub months: u32,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            delay_ms: 800,
            seed: None,
            upsell_count: 44,
            downgrade_count: 35,
            months: 24,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub host: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct InitialRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Load `config/dashboard.*`, overridden by `DASHBOARD__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
