// Telemetry rows as stored in the consumption table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::range::format::canonical;

/// One stored sample. `time` is local wall-clock time in the zone the meter writes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    #[serde(with = "canonical")]
    pub time: NaiveDateTime,
    pub power: f64,
    pub temp: f64,
    /// Energy accrued since the previous sample. Missing or non-positive marks an invalid sample.
    pub joules: Option<f64>,
}

impl Reading {
    /// Whether the row counts towards averages and the energy total.
    pub fn is_valid(&self) -> bool {
        self.joules.is_some_and(|j| j > 0.0)
    }
}

/// A sample not yet written to storage (no id assigned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub time: NaiveDateTime,
    pub power: f64,
    pub temp: f64,
    pub joules: Option<f64>,
}
