// Range resolution: preset keys and explicit bounds -> concrete TimeWindow.
// Pure: "now" is always passed in, nothing here reads the clock.

pub mod format;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::models::TimeWindow;

/// Named shorthand for a commonly requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    ThisHour,
    LastHour,
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::ThisHour,
        Preset::LastHour,
        Preset::Today,
        Preset::Yesterday,
        Preset::ThisWeek,
        Preset::LastWeek,
        Preset::ThisMonth,
        Preset::LastMonth,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Preset::ThisHour => "this-hour",
            Preset::LastHour => "last-hour",
            Preset::Today => "today",
            Preset::Yesterday => "yesterday",
            Preset::ThisWeek => "this-week",
            Preset::LastWeek => "last-week",
            Preset::ThisMonth => "this-month",
            Preset::LastMonth => "last-month",
        }
    }

    /// Two-letter code used by the old report page (`?type=TD`).
    pub fn legacy_code(self) -> &'static str {
        match self {
            Preset::ThisHour => "TH",
            Preset::LastHour => "LH",
            Preset::Today => "TD",
            Preset::Yesterday => "YD",
            Preset::ThisWeek => "TW",
            Preset::LastWeek => "LW",
            Preset::ThisMonth => "TM",
            Preset::LastMonth => "LM",
        }
    }

    /// `(from, to)` for this preset relative to `now`.
    pub fn bounds(
        self,
        now: NaiveDateTime,
        week_start: WeekStart,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let today = midnight(now);
        let hour_start = today + TimeDelta::hours(i64::from(now.hour()));
        let one_sec = TimeDelta::seconds(1);
        match self {
            Preset::ThisHour => (hour_start, now),
            Preset::LastHour => (hour_start - TimeDelta::hours(1), hour_start - one_sec),
            Preset::Today => (today, now),
            Preset::Yesterday => (today - TimeDelta::days(1), today - one_sec),
            Preset::ThisWeek => (week_start.start_of_week(now), now),
            Preset::LastWeek => {
                let this_week = week_start.start_of_week(now);
                (this_week - TimeDelta::days(7), this_week)
            }
            Preset::ThisMonth => (start_of_month(now), now),
            Preset::LastMonth => {
                let this_month = start_of_month(now);
                (start_of_month(this_month - one_sec), this_month - one_sec)
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preset {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s) || p.legacy_code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReportError::InvalidRange(format!("unknown range preset {:?}", s)))
    }
}

/// First day of the week for week presets. The historical deployment used Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Midnight on the first day of the week containing `now`.
    pub fn start_of_week(self, now: NaiveDateTime) -> NaiveDateTime {
        let days_back = match self {
            WeekStart::Sunday => now.weekday().num_days_from_sunday(),
            WeekStart::Monday => now.weekday().num_days_from_monday(),
        };
        midnight(now) - TimeDelta::days(i64::from(days_back))
    }
}

fn midnight(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN)
}

fn start_of_month(t: NaiveDateTime) -> NaiveDateTime {
    (t.date() - Days::new(u64::from(t.day0()))).and_time(NaiveTime::MIN)
}

/// Caller input in the shape of the historical query string: `?type=&from=&to=`.
/// Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RangeRequest {
    #[serde(rename = "type", default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl RangeRequest {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset: Some(preset.key().to_string()),
            ..Self::default()
        }
    }

    pub fn explicit(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            preset: None,
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }
}

fn present(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.trim().is_empty())
}

/// Resolves requests against an injected "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeResolver {
    week_start: WeekStart,
}

impl RangeResolver {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// Each bound resolves on its own: explicit text, then the preset, then the default
    /// (`from` = midnight today, `to` = now).
    pub fn resolve(&self, request: &RangeRequest, now: NaiveDateTime) -> ReportResult<TimeWindow> {
        let preset_bounds = present(&request.preset)
            .map(Preset::from_str)
            .transpose()?
            .map(|p| p.bounds(now, self.week_start));

        let from = match present(&request.from) {
            Some(s) => format::parse_canonical(s)?,
            None => preset_bounds.map_or_else(|| midnight(now), |(from, _)| from),
        };
        let to = match present(&request.to) {
            Some(s) => format::parse_canonical(s)?,
            None => preset_bounds.map_or(now, |(_, to)| to),
        };
        TimeWindow::new(from, to)
    }
}
