//! Wall-clock parsing and half-open time ranges.
//!
//! Appointment times are same-day `HH:mm` strings. They are parsed into
//! [`NaiveTime`] up front so that comparisons never fall back to string order.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{AgendaError, Result};

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a zero-padded 24-hour `HH:mm` string.
///
/// # Errors
/// Returns `AgendaError::InvalidTime` for anything that is not exactly `HH:mm`
/// (e.g. `"9:00"`, `"09:00:00"`, `"24:00"`).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    if !matches_layout(s, "dd:dd") {
        return Err(AgendaError::InvalidTime(s.to_string()));
    }
    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| AgendaError::InvalidTime(s.to_string()))
}

/// Parse a `YYYY-MM-DD` date key.
///
/// # Errors
/// Returns `AgendaError::InvalidDate` if the string is not a real calendar date
/// in that exact layout.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if !matches_layout(s, "dddd-dd-dd") {
        return Err(AgendaError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| AgendaError::InvalidDate(s.to_string()))
}

/// `d` in `layout` stands for an ASCII digit; every other byte must match exactly.
/// chrono alone accepts unpadded fields, so the layout is checked first.
fn matches_layout(s: &str, layout: &str) -> bool {
    s.len() == layout.len()
        && s.bytes().zip(layout.bytes()).all(|(c, l)| match l {
            b'd' => c.is_ascii_digit(),
            _ => c == l,
        })
}

/// Format a time back to `HH:mm`.
pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// A half-open wall-clock interval `[start, end)` within a single day.
/// Not `Deserialize`: ranges read from input go through [`TimeRange::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeRange {
    /// Build a range, rejecting empty and inverted intervals.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(AgendaError::InvalidRange {
                start: format_time(start),
                end: format_time(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse two `HH:mm` strings into a validated range.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    /// Two half-open ranges overlap iff `a.start < b.end && b.start < a.end`.
    /// Ranges that only share a boundary point do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared by both ranges, 0 when disjoint or adjacent.
    pub fn overlap_minutes(&self, other: &TimeRange) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// Serde adapter storing a [`NaiveTime`] as `HH:mm`.
///
/// Use with `#[serde(with = "agenda_engine::time::hhmm")]`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }
}
