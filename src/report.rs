// Report service: resolve the window, fetch its rows once, aggregate in one pass.
// Fetching once and folding the averages into the same pass avoids the drift a separate
// aggregate query would see if rows were appended between the two reads.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::models::{EnergyReport, Reading, WindowSummary};
use crate::range::{RangeRequest, RangeResolver};
use crate::reading_repo::ReadingRepo;
use crate::series::SeriesAggregator;

pub struct ReportService {
    repo: Arc<ReadingRepo>,
    resolver: RangeResolver,
    aggregator: SeriesAggregator,
}

impl ReportService {
    pub fn new(repo: Arc<ReadingRepo>, config: &ReportConfig) -> Self {
        Self {
            repo,
            resolver: RangeResolver::new(config.week_start),
            aggregator: SeriesAggregator::new(config.max_results),
        }
    }

    /// Full report: aggregates, peak, reduced series and the current reading.
    #[instrument(skip(self), fields(operation = "report"))]
    pub async fn report(
        &self,
        request: &RangeRequest,
        now: NaiveDateTime,
    ) -> ReportResult<EnergyReport> {
        let window = self.resolver.resolve(request, now)?;
        debug!(?window, "resolved report window");

        let readings = self.repo.readings_in_window(&window).await?;
        let summary = match self.aggregator.aggregate(&window, &readings) {
            Ok(s) => s,
            Err(e @ ReportError::EmptyWindow { .. }) => {
                info!(?window, "no readings in window");
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        debug!(
            rows = summary.row_count,
            valid_rows = summary.valid_row_count,
            stride = summary.stride,
            points = summary.reduced_series.len(),
            "aggregated window"
        );

        let current = self.repo.latest_reading().await?;
        Ok(EnergyReport {
            window,
            current,
            summary,
        })
    }

    /// Aggregate-only view computed by storage; no rows are transferred. `EmptyWindow` when
    /// the window holds no rows at all.
    #[instrument(skip(self), fields(operation = "summary"))]
    pub async fn summary(
        &self,
        request: &RangeRequest,
        now: NaiveDateTime,
    ) -> ReportResult<WindowSummary> {
        let window = self.resolver.resolve(request, now)?;
        debug!(?window, "resolved summary window");

        let aggregates = self.repo.window_aggregates(&window).await?;
        if aggregates.row_count == 0 {
            info!(?window, "no readings in window");
            return Err(ReportError::EmptyWindow {
                from: window.from(),
                to: window.to(),
            });
        }
        Ok(WindowSummary {
            window,
            aggregates,
            total_energy_kwh: aggregates.total_energy_kwh(),
        })
    }

    pub async fn current(&self) -> ReportResult<Option<Reading>> {
        self.repo.latest_reading().await
    }
}
