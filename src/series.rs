// Series aggregation: one forward pass over a window's readings computes the averages,
// energy total, peak power and the strided reduced series.
// Rows are trusted to arrive in ascending id order; nothing here re-sorts.

use chrono::NaiveDateTime;

use crate::error::{ReportError, ReportResult};
use crate::models::{AggregateResult, JOULES_PER_KWH, Reading, SeriesPoint, TimeWindow};

/// Rows between kept points: `ceil(rows / max_results)`, never below 1.
pub fn stride_for(row_count: usize, max_results: usize) -> usize {
    row_count.div_ceil(max_results.max(1)).max(1)
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesAggregator {
    max_results: usize,
}

impl SeriesAggregator {
    /// `max_results` of 0 is treated as 1.
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results: max_results.max(1),
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Aggregates readings already filtered to `window`. `EmptyWindow` when there are none.
    pub fn aggregate(
        &self,
        window: &TimeWindow,
        readings: &[Reading],
    ) -> ReportResult<AggregateResult> {
        let mut acc = SeriesAccumulator::new(readings.len(), self.max_results);
        for r in readings {
            acc.push(r);
        }
        acc.finish().ok_or(ReportError::EmptyWindow {
            from: window.from(),
            to: window.to(),
        })
    }
}

/// Running state of one pass. The row count must be known up front to fix the stride;
/// rows pushed beyond it are refused so the series never exceeds `max_results` points.
#[derive(Debug, Clone)]
pub struct SeriesAccumulator {
    row_count: usize,
    stride: usize,
    position: usize,
    refused: usize,
    valid_count: usize,
    power_sum: f64,
    temp_sum: f64,
    joules_sum: f64,
    max: Option<(f64, NaiveDateTime)>,
    series: Vec<SeriesPoint>,
}

impl SeriesAccumulator {
    pub fn new(row_count: usize, max_results: usize) -> Self {
        let stride = stride_for(row_count, max_results);
        Self {
            row_count,
            stride,
            position: 0,
            refused: 0,
            valid_count: 0,
            power_sum: 0.0,
            temp_sum: 0.0,
            joules_sum: 0.0,
            max: None,
            series: Vec::with_capacity(row_count.div_ceil(stride)),
        }
    }

    /// Folds one row in. Returns `false`, and leaves the result untouched, once the declared
    /// row count has been reached.
    pub fn push(&mut self, r: &Reading) -> bool {
        if self.position >= self.row_count {
            self.refused += 1;
            return false;
        }

        if let Some(j) = r.joules.filter(|_| r.is_valid()) {
            self.valid_count += 1;
            self.power_sum += r.power;
            self.temp_sum += r.temp;
            self.joules_sum += j;
        }

        // strict > keeps the earliest time on ties
        match self.max {
            Some((max, _)) if r.power <= max => {}
            _ => self.max = Some((r.power, r.time)),
        }

        if self.position % self.stride == 0 {
            self.series.push(SeriesPoint {
                time: r.time,
                power: r.power,
            });
        }
        self.position += 1;
        true
    }

    /// Rows turned away by `push` after the declared count was reached.
    pub fn refused(&self) -> usize {
        self.refused
    }

    /// `None` when no row was pushed.
    pub fn finish(self) -> Option<AggregateResult> {
        let (max_power, max_power_time) = self.max?;
        let first_series_time = self.series.first()?.time;
        let last_series_time = self.series.last()?.time;

        let (avg_power, avg_temp) = if self.valid_count > 0 {
            let n = self.valid_count as f64;
            (Some(self.power_sum / n), Some(self.temp_sum / n))
        } else {
            (None, None)
        };

        Some(AggregateResult {
            avg_power,
            avg_temp,
            total_energy_joules: self.joules_sum,
            total_energy_kwh: self.joules_sum / JOULES_PER_KWH,
            max_power,
            max_power_time,
            reduced_series: self.series,
            first_series_time,
            last_series_time,
            row_count: self.position,
            valid_row_count: self.valid_count,
            stride: self.stride,
        })
    }
}
