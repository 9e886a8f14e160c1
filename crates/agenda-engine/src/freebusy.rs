//! Compute a psychologist's free slots for one day.
//!
//! Collects the live appointments of that psychologist, clips them to the
//! requested window, merges overlapping busy periods, then returns the gaps.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::appointment::AppointmentsByDate;
use crate::time::{hhmm, TimeRange};

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn between(range: TimeRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
            duration_minutes: range.duration_minutes(),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Cancelled appointments and other psychologists' appointments are ignored.
/// Returns a sorted, non-overlapping list of ranges.
pub fn busy_ranges(
    appointments: &AppointmentsByDate,
    date: NaiveDate,
    psychologist_id: &str,
    window: TimeRange,
) -> Vec<TimeRange> {
    let mut intervals: Vec<TimeRange> = appointments
        .get(&date)
        .into_iter()
        .flatten()
        .filter(|a| a.psychologist_id == psychologist_id && !a.status.is_cancelled())
        .map(|a| a.range())
        .filter(|r| r.overlaps(&window))
        .map(|r| TimeRange {
            start: r.start.max(window.start),
            end: r.end.min(window.end),
        })
        .collect();

    intervals.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange> = Vec::new();
    for range in intervals {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Free slots for `psychologist_id` on `date` inside `window`, sorted by start.
pub fn find_free_slots(
    appointments: &AppointmentsByDate,
    date: NaiveDate,
    psychologist_id: &str,
    window: TimeRange,
) -> Vec<FreeSlot> {
    let merged = busy_ranges(appointments, date, psychologist_id, window);

    let mut free_slots = Vec::new();
    let mut cursor = window.start;

    for busy in &merged {
        if cursor < busy.start {
            free_slots.push(FreeSlot::between(TimeRange {
                start: cursor,
                end: busy.start,
            }));
        }
        cursor = cursor.max(busy.end);
    }

    // Trailing gap after the last busy period.
    if cursor < window.end {
        free_slots.push(FreeSlot::between(TimeRange {
            start: cursor,
            end: window.end,
        }));
    }

    free_slots
}

/// The earliest free slot of at least `min_duration_minutes`.
pub fn find_first_free_slot(
    appointments: &AppointmentsByDate,
    date: NaiveDate,
    psychologist_id: &str,
    window: TimeRange,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_free_slots(appointments, date, psychologist_id, window)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}
