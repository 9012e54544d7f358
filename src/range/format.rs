// Canonical bound text format shared with callers: `HH:MM:SS DD/MM/YYYY`, 24-hour clock.

use chrono::{NaiveDateTime, Timelike};

use crate::error::{ReportError, ReportResult};

pub const CANONICAL_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// Byte positions of the separators in `HH:MM:SS DD/MM/YYYY`; every other byte is a digit.
const SEPARATORS: [(usize, u8); 5] = [(2, b':'), (5, b':'), (8, b' '), (11, b'/'), (14, b'/')];
const CANONICAL_LEN: usize = 19;

fn invalid(s: &str, reason: impl std::fmt::Display) -> ReportError {
    ReportError::InvalidRange(format!(
        "{:?} is not a valid HH:MM:SS DD/MM/YYYY time: {}",
        s, reason
    ))
}

/// Parse an explicit bound. Surrounding whitespace is ignored; inside it the text must match
/// the format exactly (zero-padded fields, four-digit year, single space).
pub fn parse_canonical(s: &str) -> ReportResult<NaiveDateTime> {
    let trimmed = s.trim();
    let bytes = trimmed.as_bytes();
    let shape_ok = bytes.len() == CANONICAL_LEN
        && bytes.iter().enumerate().all(|(i, b)| {
            match SEPARATORS.iter().find(|(pos, _)| *pos == i) {
                Some((_, sep)) => b == sep,
                None => b.is_ascii_digit(),
            }
        });
    if !shape_ok {
        return Err(invalid(s, "wrong shape"));
    }

    let t = NaiveDateTime::parse_from_str(trimmed, CANONICAL_FORMAT).map_err(|e| invalid(s, e))?;
    // chrono reads second 60 as a leap second
    if t.nanosecond() >= 1_000_000_000 {
        return Err(invalid(s, "leap seconds are not accepted"));
    }
    Ok(t)
}

pub fn format_canonical(t: &NaiveDateTime) -> String {
    t.format(CANONICAL_FORMAT).to_string()
}

/// `#[serde(with = "canonical")]` for `NaiveDateTime` fields.
pub mod canonical {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::CANONICAL_FORMAT;

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&t.format(CANONICAL_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_canonical(&s).map_err(serde::de::Error::custom)
    }
}
