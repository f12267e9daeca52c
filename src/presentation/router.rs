// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    account_details, dashboard_overview, geo_map, health_check, health_renewal, health_scores,
    list_customers, list_sales_reps, segment_distribution, update_date_range, update_selection,
};
use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard_overview))
        .route("/dashboard/health-renewal", get(health_renewal))
        .route("/dashboard/health-scores", get(health_scores))
        .route("/dashboard/distribution", get(segment_distribution))
        .route("/dashboard/geo/:level", get(geo_map))
        .route("/session/selection", put(update_selection))
        .route("/session/date-range", put(update_date_range))
        .route("/filters/customers", get(list_customers))
        .route("/filters/sales-reps", get(list_sales_reps))
        .route("/accounts/:id", get(account_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
