// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_repository::DashboardRepository;
use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_session::DashboardSession;
use crate::domain::dashboard::DateRange;
use crate::infrastructure::config::{AppConfig, DataSourceKind, load_app_config};
use crate::infrastructure::http_repository::HttpDashboardRepository;
use crate::infrastructure::mock_repository::MockDashboardRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

const DEFAULT_RANGE_DAYS: u64 = 30;

fn build_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn DashboardRepository>> {
    match config.data_source {
        DataSourceKind::Mock => {
            tracing::info!("Using generated mock data (seed: {:?})", config.mock.seed);
            Ok(Arc::new(MockDashboardRepository::new(config.mock.clone())))
        }
        DataSourceKind::Http => {
            let Some(backend) = &config.backend else {
                anyhow::bail!("data_source = \"http\" requires a [backend] section");
            };
            tracing::info!("Using dashboard backend at {}", backend.host);
            Ok(Arc::new(HttpDashboardRepository::new(backend)?))
        }
    }
}

fn initial_range(config: &AppConfig) -> anyhow::Result<DateRange> {
    match config.initial_range {
        Some(range) => Ok(DateRange::new(range.start_date, range.end_date)?),
        None => Ok(DateRange::trailing_days(
            chrono::Local::now().date_naive(),
            DEFAULT_RANGE_DAYS,
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = build_repository(&config)?;

    // Create services (application layer)
    let session = Arc::new(DashboardSession::new(repository));
    let range = initial_range(&config)?;
    match session.load(range).await {
        Ok(_) => tracing::info!(
            "Loaded dashboard for {} to {} (request {:?})",
            range.start_date,
            range.end_date,
            session.loaded_request().await
        ),
        // The server still starts; a later date-range change retries the fetch.
        Err(e) => tracing::warn!("Initial dashboard load failed: {}", e),
    }
    let dashboard_service = DashboardService::new(session);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting cs-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
