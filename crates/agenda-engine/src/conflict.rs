//! Detect scheduling conflicts for a proposed booking.
//!
//! A proposed entry conflicts with an existing appointment when both belong to
//! the same psychologist, fall on the same day, the existing one is not
//! cancelled, and their half-open intervals overlap. Adjacent appointments
//! (where one ends exactly when the other starts) are NOT conflicts.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, trace};

use crate::appointment::{Appointment, AppointmentsByDate};
use crate::error::Result;
use crate::time::{parse_date, TimeRange};

/// An existing appointment that collides with a proposed booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleConflict {
    pub existing: Appointment,
    pub overlap_minutes: i64,
}

/// Appointments on `date` that can collide with a booking for `psychologist_id`:
/// same practitioner, not cancelled. Other days are never considered.
fn candidates<'a>(
    appointments: &'a AppointmentsByDate,
    date: NaiveDate,
    psychologist_id: &'a str,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    appointments
        .get(&date)
        .into_iter()
        .flatten()
        .filter(move |a| a.psychologist_id == psychologist_id)
        .filter(|a| !a.status.is_cancelled())
}

/// Whether `proposed` collides with any live appointment of the same
/// psychologist on `date`.
///
/// `is_block_time` marks the proposed entry as a blocked slot. It does not
/// change the outcome: blocked slots and sessions are tested with the same
/// half-open overlap rule, in both directions. Whether blocks deserve looser or
/// stricter treatment is an open product question.
pub fn has_schedule_conflict(
    appointments: &AppointmentsByDate,
    date: NaiveDate,
    proposed: TimeRange,
    psychologist_id: &str,
    is_block_time: bool,
) -> bool {
    let hit = candidates(appointments, date, psychologist_id).find(|a| {
        trace!(
            existing = %a.range(),
            blocked_slot = a.is_blocked_slot(),
            is_block_time,
            "comparing against existing appointment"
        );
        proposed.overlaps(&a.range())
    });

    if let Some(existing) = hit {
        debug!(
            %date,
            %proposed,
            psychologist_id,
            existing = %existing.range(),
            "schedule conflict"
        );
    }
    hit.is_some()
}

/// Every live appointment that collides with `proposed`, with the shared minutes.
///
/// Applies the same filters as [`has_schedule_conflict`]; the two agree on
/// whether the result is empty.
pub fn find_schedule_conflicts(
    appointments: &AppointmentsByDate,
    date: NaiveDate,
    proposed: TimeRange,
    psychologist_id: &str,
    is_block_time: bool,
) -> Vec<ScheduleConflict> {
    let conflicts: Vec<ScheduleConflict> = candidates(appointments, date, psychologist_id)
        .filter(|a| proposed.overlaps(&a.range()))
        .map(|a| ScheduleConflict {
            existing: a.clone(),
            overlap_minutes: proposed.overlap_minutes(&a.range()),
        })
        .collect();

    debug!(
        %date,
        %proposed,
        psychologist_id,
        is_block_time,
        count = conflicts.len(),
        "collected schedule conflicts"
    );
    conflicts
}

/// String entry point used by the booking flow: parse the date key and the
/// `HH:mm` times, then run [`has_schedule_conflict`].
///
/// # Errors
/// Returns `AgendaError::InvalidDate` or `AgendaError::InvalidTime` for malformed
/// input, and `AgendaError::InvalidRange` when `start >= end`.
pub fn check_booking(
    appointments: &AppointmentsByDate,
    date_key: &str,
    start_time: &str,
    end_time: &str,
    psychologist_id: &str,
    is_block_time: bool,
) -> Result<bool> {
    let date = parse_date(date_key)?;
    let proposed = TimeRange::parse(start_time, end_time)?;
    Ok(has_schedule_conflict(
        appointments,
        date,
        proposed,
        psychologist_id,
        is_block_time,
    ))
}
