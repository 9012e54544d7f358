// Resolved query window

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::range::format::{canonical, format_canonical};

/// Inclusive `[from, to]` pair, serialized in the canonical `HH:MM:SS DD/MM/YYYY` text format
/// so a caller can send it straight back as explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(with = "canonical")]
    from: NaiveDateTime,
    #[serde(with = "canonical")]
    to: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> ReportResult<Self> {
        if from > to {
            return Err(ReportError::InvalidRange(format!(
                "from ({}) is after to ({})",
                format_canonical(&from),
                format_canonical(&to)
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    pub fn to(&self) -> NaiveDateTime {
        self.to
    }
}
