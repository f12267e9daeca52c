// HTTP request handlers
use crate::application::dashboard_service::{DashboardError, GeoLevel};
use crate::application::dashboard_session::{LoadOutcome, Selection};
use crate::domain::dashboard::{DateRange, DateRangeError};
use crate::domain::segment_filter::SegmentFilter;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SegmentQuery {
    pub segment: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `YYYY-MM`; takes precedence over explicit dates
    pub month: Option<String>,
}

impl DateRangeRequest {
    fn resolve(&self) -> Result<DateRange, DateRangeError> {
        if let Some(month) = &self.month {
            return DateRange::parse_month(month);
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => Err(DateRangeError::Incomplete),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub segment: Option<String>,
    pub customer_id: Option<String>,
    pub sales_rep_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct SupersededBody {
    status: &'static str,
    request: u64,
}

fn error_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::Fetch(_) => StatusCode::BAD_GATEWAY,
        DashboardError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
    }
}

async fn error_response(status: StatusCode, message: String, compress: bool) -> Response {
    json_response(status, &ErrorBody { error: message }, compress)
        .await
        .unwrap_or_else(|status| status.into_response())
}

async fn respond<T: Serialize>(result: Result<T, DashboardError>, compress: bool) -> Response {
    match result {
        Ok(data) => json_response(StatusCode::OK, &data, compress)
            .await
            .unwrap_or_else(|status| status.into_response()),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::error!("Dashboard request failed: {}", e);
            } else {
                tracing::debug!("Dashboard request rejected: {}", e);
            }
            error_response(status, e.to_string(), compress).await
        }
    }
}

async fn requested_segment(state: &AppState, query: &SegmentQuery) -> SegmentFilter {
    match &query.segment {
        Some(raw) => SegmentFilter::from_param(Some(raw.as_str())),
        None => state.dashboard_service.selected_segment().await,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Overview with the segment filter applied to every section
pub async fn dashboard_overview(
    Query(query): Query<SegmentQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let filter = requested_segment(&state, &query).await;
    let result = state.dashboard_service.overview(filter).await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn health_renewal(
    Query(query): Query<SegmentQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let filter = requested_segment(&state, &query).await;
    let result = state.dashboard_service.health_renewal(filter).await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn health_scores(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.dashboard_service.health_scores().await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn segment_distribution(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.dashboard_service.distribution().await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn geo_map(
    Path(level): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let Some(level) = GeoLevel::from_param(&level) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown map level '{}'", level), compress).await;
    };
    let result = state.dashboard_service.geo_map(level).await;
    respond(result, compress).await
}

/// Change the selected segment, customer and sales rep
pub async fn update_selection(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    let selection = Selection {
        segment: SegmentFilter::from_param(request.segment.as_deref()),
        customer_id: request.customer_id,
        sales_rep_id: request.sales_rep_id,
    };
    let result = state.dashboard_service.select(selection).await;
    respond(result, accepts_brotli(&headers)).await
}

/// Reload the dashboard for a new date range
pub async fn update_date_range(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DateRangeRequest>,
) -> Response {
    let compress = accepts_brotli(&headers);

    let range = match request.resolve() {
        Ok(range) => range,
        Err(e) => return respond::<()>(Err(e.into()), compress).await,
    };

    match state.dashboard_service.change_date_range(range).await {
        Ok(LoadOutcome::Applied(_)) => {
            let filter = state.dashboard_service.selected_segment().await;
            let result = state.dashboard_service.overview(filter).await;
            respond(result, compress).await
        }
        Ok(LoadOutcome::Superseded { request }) => {
            let body = SupersededBody {
                status: "superseded",
                request,
            };
            json_response(StatusCode::ACCEPTED, &body, compress)
                .await
                .unwrap_or_else(|status| status.into_response())
        }
        Err(e) => respond::<()>(Err(e), compress).await,
    }
}

pub async fn list_customers(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.dashboard_service.customers().await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn list_sales_reps(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.dashboard_service.sales_reps().await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn account_details(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let today = chrono::Local::now().date_naive();
    let result = state.dashboard_service.account(&id, today).await;
    respond(result, accepts_brotli(&headers)).await
}
