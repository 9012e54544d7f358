// Report error taxonomy. Kinds are kept distinct so callers can word each one differently.

use chrono::NaiveDateTime;

use crate::range::format::format_canonical;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Unparseable, unknown or inverted range input. Rejected, never clamped.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The window holds no rows at all.
    #[error("no data between {} and {}", format_canonical(.from), format_canonical(.to))]
    EmptyWindow {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    /// Storage could not be reached or the query failed. Not retried.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

impl ReportError {
    /// Stable machine-readable kind, used in API error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::InvalidRange(_) => "invalid_range",
            ReportError::EmptyWindow { .. } => "empty_window",
            ReportError::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
