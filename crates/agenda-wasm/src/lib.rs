//! WASM bindings for agenda-engine.
//!
//! Exposes conflict detection, free-slot computation and the permission table
//! to the booking UI via `wasm-bindgen`. Appointment snapshots cross the
//! boundary as the same JSON the front end stores (`{"YYYY-MM-DD": [...]}`),
//! and results come back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p agenda-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/agenda_wasm.wasm
//! ```

use agenda_engine::conflict::ScheduleConflict;
use agenda_engine::time::{format_time, parse_date};
use agenda_engine::{AppointmentsByDate, FreeSlot, TimeRange};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto {
    appointment_id: Option<String>,
    start_time: String,
    end_time: String,
    #[serde(rename = "type")]
    kind: String,
    overlap_minutes: i64,
}

impl From<&ScheduleConflict> for ConflictDto {
    fn from(c: &ScheduleConflict) -> Self {
        Self {
            appointment_id: c.existing.id.clone(),
            start_time: format_time(c.existing.start_time),
            end_time: format_time(c.existing.end_time),
            kind: c.existing.kind.clone(),
            overlap_minutes: c.overlap_minutes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeSlotDto {
    start_time: String,
    end_time: String,
    duration_minutes: i64,
}

impl From<&FreeSlot> for FreeSlotDto {
    fn from(s: &FreeSlot) -> Self {
        Self {
            start_time: format_time(s.start),
            end_time: format_time(s.end),
            duration_minutes: s.duration_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_snapshot(json: &str) -> Result<AppointmentsByDate, JsValue> {
    agenda_engine::parse_snapshot(json).map_err(js_err)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Whether a proposed booking collides with the psychologist's agenda.
///
/// # Arguments
/// - `appointments_json` -- snapshot keyed by `YYYY-MM-DD`
/// - `date_key` -- day of the booking
/// - `start_time`, `end_time` -- `HH:mm`, start strictly before end
/// - `psychologist_id` -- whose agenda is checked
/// - `is_block_time` -- the proposed entry is a blocked slot
///
/// Throws on malformed JSON, dates or times. The whole snapshot is validated
/// before the check runs: a malformed entry on an unrelated day or for another
/// psychologist (e.g. an unpadded `"9:00"`), a key that is not `YYYY-MM-DD`, or
/// the same day under two keys makes this throw rather than skip that entry.
#[wasm_bindgen(js_name = "hasScheduleConflict")]
pub fn has_schedule_conflict(
    appointments_json: &str,
    date_key: &str,
    start_time: &str,
    end_time: &str,
    psychologist_id: &str,
    is_block_time: bool,
) -> Result<bool, JsValue> {
    let appointments = parse_snapshot(appointments_json)?;
    agenda_engine::check_booking(
        &appointments,
        date_key,
        start_time,
        end_time,
        psychologist_id,
        is_block_time,
    )
    .map_err(js_err)
}

/// Every appointment that collides with a proposed booking.
///
/// Returns a JSON array of `{appointmentId, startTime, endTime, type,
/// overlapMinutes}` objects.
#[wasm_bindgen(js_name = "findScheduleConflicts")]
pub fn find_schedule_conflicts(
    appointments_json: &str,
    date_key: &str,
    start_time: &str,
    end_time: &str,
    psychologist_id: &str,
    is_block_time: bool,
) -> Result<String, JsValue> {
    let appointments = parse_snapshot(appointments_json)?;
    let date = parse_date(date_key).map_err(js_err)?;
    let proposed = TimeRange::parse(start_time, end_time).map_err(js_err)?;

    let conflicts = agenda_engine::find_schedule_conflicts(
        &appointments,
        date,
        proposed,
        psychologist_id,
        is_block_time,
    );
    let dtos: Vec<ConflictDto> = conflicts.iter().map(ConflictDto::from).collect();
    to_json(&dtos)
}

/// Free slots for a psychologist on one day, inside `[window_start, window_end)`.
///
/// Returns a JSON array of `{startTime, endTime, durationMinutes}` objects.
#[wasm_bindgen(js_name = "findFreeSlots")]
pub fn find_free_slots(
    appointments_json: &str,
    date_key: &str,
    psychologist_id: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let appointments = parse_snapshot(appointments_json)?;
    let date = parse_date(date_key).map_err(js_err)?;
    let window = TimeRange::parse(window_start, window_end).map_err(js_err)?;

    let slots = agenda_engine::find_free_slots(&appointments, date, psychologist_id, window);
    let dtos: Vec<FreeSlotDto> = slots.iter().map(FreeSlotDto::from).collect();
    to_json(&dtos)
}

/// Look up the static role/action permission table.
///
/// Throws on an unknown role or action name.
#[wasm_bindgen(js_name = "hasPermission")]
pub fn has_permission(role: &str, action: &str) -> Result<bool, JsValue> {
    let role: agenda_engine::Role = role.parse().map_err(js_err)?;
    let action: agenda_engine::Action = action.parse().map_err(js_err)?;
    Ok(agenda_engine::has_permission(role, action))
}
