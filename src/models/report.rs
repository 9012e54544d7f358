// Report records handed to the presentation layer. Built per request, never stored.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Reading, TimeWindow};
use crate::range::format::canonical;

pub const JOULES_PER_KWH: f64 = 3_600_000.0;

/// One kept point of the reduced series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    #[serde(with = "canonical")]
    pub time: NaiveDateTime,
    pub power: f64,
}

/// Output of one aggregation pass over a window. Times serialize as `HH:MM:SS DD/MM/YYYY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Mean power over valid rows; `None` when no row in the window is valid.
    pub avg_power: Option<f64>,
    pub avg_temp: Option<f64>,
    pub total_energy_joules: f64,
    pub total_energy_kwh: f64,
    pub max_power: f64,
    #[serde(with = "canonical")]
    pub max_power_time: NaiveDateTime,
    pub reduced_series: Vec<SeriesPoint>,
    #[serde(with = "canonical")]
    pub first_series_time: NaiveDateTime,
    #[serde(with = "canonical")]
    pub last_series_time: NaiveDateTime,
    pub row_count: usize,
    pub valid_row_count: usize,
    pub stride: usize,
}

/// Storage-side aggregate (no series, no max). Averages and the energy total cover valid rows
/// only; `row_count` counts every row in the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAggregates {
    pub avg_power: Option<f64>,
    pub avg_temp: Option<f64>,
    pub total_energy_joules: Option<f64>,
    pub row_count: i64,
    pub valid_row_count: i64,
}

impl WindowAggregates {
    pub fn total_energy_kwh(&self) -> Option<f64> {
        self.total_energy_joules.map(|j| j / JOULES_PER_KWH)
    }
}

/// Full report for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReport {
    pub window: TimeWindow,
    /// Most recent row in storage, independent of the window.
    pub current: Option<Reading>,
    pub summary: AggregateResult,
}

/// Aggregate-only view of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub window: TimeWindow,
    #[serde(flatten)]
    pub aggregates: WindowAggregates,
    pub total_energy_kwh: Option<f64>,
}
