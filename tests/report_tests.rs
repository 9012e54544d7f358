// ReportService tests: resolve -> fetch -> aggregate against a real SQLite file

mod common;

use std::sync::Arc;

use chrono::TimeDelta;
use common::{at, new_reading, temp_repo};
use currentcost::config::ReportConfig;
use currentcost::error::ReportError;
use currentcost::range::{Preset, RangeRequest, WeekStart};
use currentcost::reading_repo::ReadingRepo;
use currentcost::report::ReportService;
use tempfile::TempDir;

fn service(repo: ReadingRepo, max_results: usize) -> ReportService {
    ReportService::new(
        Arc::new(repo),
        &ReportConfig {
            max_results,
            week_start: WeekStart::Monday,
        },
    )
}

async fn seeded() -> (TempDir, ReadingRepo) {
    let (dir, repo) = temp_repo().await;
    let t = at(2024, 1, 17, 9, 0, 0);
    repo.save_readings(&[
        new_reading(t, 100.0, 20.0, Some(50.0)),
        new_reading(t + TimeDelta::seconds(6), 200.0, 21.0, Some(0.0)),
        new_reading(t + TimeDelta::seconds(12), 150.0, 19.0, Some(60.0)),
        // the next day, outside the window below
        new_reading(at(2024, 1, 18, 9, 0, 0), 80.0, 18.0, Some(10.0)),
    ])
    .await
    .unwrap();
    (dir, repo)
}

#[tokio::test]
async fn report_explicit_window() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    let req = RangeRequest::explicit("08:00:00 17/01/2024", "10:00:00 17/01/2024");

    let report = svc.report(&req, at(2024, 1, 18, 12, 0, 0)).await.unwrap();

    assert_eq!(report.window.from(), at(2024, 1, 17, 8, 0, 0));
    assert_eq!(report.window.to(), at(2024, 1, 17, 10, 0, 0));
    let s = &report.summary;
    assert_eq!(s.avg_power, Some(125.0));
    assert_eq!(s.total_energy_joules, 110.0);
    assert_eq!(s.max_power, 200.0);
    assert_eq!(s.max_power_time, at(2024, 1, 17, 9, 0, 6));
    assert_eq!(s.reduced_series.len(), 3);
    assert_eq!(s.first_series_time, at(2024, 1, 17, 9, 0, 0));
    assert_eq!(s.last_series_time, at(2024, 1, 17, 9, 0, 12));

    // current reading ignores the window
    let current = report.current.unwrap();
    assert_eq!(current.power, 80.0);
}

#[tokio::test]
async fn report_preset_uses_injected_now() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);

    let report = svc
        .report(&RangeRequest::preset(Preset::Yesterday), at(2024, 1, 18, 12, 0, 0))
        .await
        .unwrap();
    assert_eq!(report.summary.row_count, 3);

    let report = svc
        .report(&RangeRequest::preset(Preset::Today), at(2024, 1, 18, 12, 0, 0))
        .await
        .unwrap();
    assert_eq!(report.summary.row_count, 1);
    assert_eq!(report.summary.max_power, 80.0);
}

#[tokio::test]
async fn report_empty_window() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    let err = svc
        .report(&RangeRequest::preset(Preset::LastMonth), at(2024, 1, 18, 12, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::EmptyWindow { .. }));
    assert_eq!(err.kind(), "empty_window");
}

#[tokio::test]
async fn report_invalid_range() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    let req = RangeRequest::explicit("08:00:00 01/01/2024", "07:00:00 01/01/2024");
    let err = svc.report(&req, at(2024, 1, 18, 12, 0, 0)).await.unwrap_err();
    assert!(matches!(err, ReportError::InvalidRange(_)));
    assert_eq!(err.kind(), "invalid_range");
}

#[tokio::test]
async fn report_reduces_long_windows() {
    let (_dir, repo) = temp_repo().await;
    let start = at(2024, 2, 1, 0, 0, 0);
    let rows: Vec<_> = (0..1000)
        .map(|i| new_reading(start + TimeDelta::seconds(6 * i), (i % 97) as f64, 20.0, Some(6.0)))
        .collect();
    repo.save_readings(&rows).await.unwrap();
    let svc = service(repo, 100);

    let report = svc
        .report(&RangeRequest::preset(Preset::Today), at(2024, 2, 1, 23, 0, 0))
        .await
        .unwrap();
    let s = report.summary;
    assert_eq!(s.row_count, 1000);
    assert_eq!(s.stride, 10);
    assert_eq!(s.reduced_series.len(), 100);
    assert_eq!(s.reduced_series[1].time, start + TimeDelta::seconds(60));
    assert_eq!(s.max_power, 96.0);
    assert_eq!(s.max_power_time, start + TimeDelta::seconds(6 * 96));
    assert_eq!(s.total_energy_joules, 6000.0);
}

#[tokio::test]
async fn summary_uses_storage_aggregates() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    let req = RangeRequest::explicit("08:00:00 17/01/2024", "10:00:00 17/01/2024");
    let summary = svc.summary(&req, at(2024, 1, 18, 12, 0, 0)).await.unwrap();
    assert_eq!(summary.aggregates.row_count, 3);
    assert_eq!(summary.aggregates.valid_row_count, 2);
    assert_eq!(summary.aggregates.avg_power, Some(125.0));
    assert_eq!(summary.aggregates.total_energy_joules, Some(110.0));
}

#[tokio::test]
async fn summary_of_window_without_rows_is_empty_window() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    let req = RangeRequest::explicit("00:00:00 16/01/2024", "23:59:59 16/01/2024");
    let err = svc.summary(&req, at(2024, 1, 18, 12, 0, 0)).await.unwrap_err();
    assert!(matches!(err, ReportError::EmptyWindow { .. }));
}

#[tokio::test]
async fn summary_of_only_invalid_rows_is_not_empty() {
    let (_dir, repo) = seeded().await;
    let svc = service(repo, 10);
    // only the zero-joules sample at 09:00:06
    let req = RangeRequest::explicit("09:00:05 17/01/2024", "09:00:10 17/01/2024");
    let summary = svc.summary(&req, at(2024, 1, 18, 12, 0, 0)).await.unwrap();
    assert_eq!(summary.aggregates.row_count, 1);
    assert_eq!(summary.aggregates.valid_row_count, 0);
    assert_eq!(summary.aggregates.avg_power, None);
    assert_eq!(summary.total_energy_kwh, None);
}

#[tokio::test]
async fn report_storage_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_table.db");
    let repo = ReadingRepo::connect(path.to_str().unwrap(), 1).await.unwrap();
    let svc = service(repo, 10);
    let err = svc
        .report(&RangeRequest::default(), at(2024, 1, 18, 12, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::StorageUnavailable(_)));
}
