// Energy report handlers. Query shape matches the old report page: ?type=&from=&to=

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::ReportError;
use crate::range::RangeRequest;

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ReportError::EmptyWindow { .. } => StatusCode::NOT_FOUND,
            ReportError::StorageUnavailable(e) => {
                tracing::error!(error = %e, "storage query failed");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = Json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// GET /api/energy — full report for the requested window.
pub(super) async fn report_handler(
    State(state): State<AppState>,
    Query(request): Query<RangeRequest>,
) -> Result<impl IntoResponse, ReportError> {
    let now = (state.clock)();
    let report = state.reports.report(&request, now).await?;
    Ok(Json(report))
}

/// GET /api/energy/summary — storage-side aggregates only.
pub(super) async fn summary_handler(
    State(state): State<AppState>,
    Query(request): Query<RangeRequest>,
) -> Result<impl IntoResponse, ReportError> {
    let now = (state.clock)();
    let summary = state.reports.summary(&request, now).await?;
    Ok(Json(summary))
}

/// GET /api/current — latest stored reading, 404 when the table is empty.
pub(super) async fn current_handler(State(state): State<AppState>) -> Response {
    match state.reports.current().await {
        Ok(Some(reading)) => Json(reading).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "no_readings",
                "message": "no readings stored yet",
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
