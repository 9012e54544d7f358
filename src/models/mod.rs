// Domain models

mod reading;
mod report;
mod window;

pub use reading::{NewReading, Reading};
pub use report::{
    AggregateResult, EnergyReport, JOULES_PER_KWH, SeriesPoint, WindowAggregates, WindowSummary,
};
pub use window::TimeWindow;
