// HTTP routes

mod energy;
mod http;

use axum::{Router, routing::get};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::report::ReportService;

/// Source of "now" for range resolution. Local wall-clock time in production.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().naive_local())
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) reports: Arc<ReportService>,
    pub(crate) clock: Clock,
}

pub fn app(reports: Arc<ReportService>) -> Router {
    app_with_clock(reports, local_clock())
}

pub fn app_with_clock(reports: Arc<ReportService>, clock: Clock) -> Router {
    let state = AppState { reports, clock };
    Router::new()
        .route("/", get(|| async { "currentcost energy monitor" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/energy", get(energy::report_handler)) // GET /api/energy?type=&from=&to=
        .route("/api/energy/summary", get(energy::summary_handler)) // GET /api/energy/summary
        .route("/api/current", get(energy::current_handler)) // GET /api/current
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
