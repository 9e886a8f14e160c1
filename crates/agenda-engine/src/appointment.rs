//! Appointment records as stored by the booking UI.
//!
//! The JSON shape is camelCase (`psychologistId`, `startTime`, ...) and statuses
//! are kebab-case, matching the documents the front end persists. Times are
//! validated on the way in, so a snapshot that deserializes never holds a
//! malformed `HH:mm` value.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AgendaError, Result};
use crate::time::{hhmm, parse_date, TimeRange};

/// `type` value marking an entry that reserves time without a patient session.
pub const BLOCKED_SLOT: &str = "Blocked Slot";

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    CancelledByPatient,
    CancelledByClinic,
    NoShow,
}

impl AppointmentStatus {
    /// Cancelled entries never block new bookings.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::CancelledByPatient | Self::CancelledByClinic)
    }
}

/// A single agenda entry: a patient session or a blocked slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub psychologist_id: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Appointment {
    /// The stored interval. Stored entries are assumed well-formed
    /// (`start_time < end_time`); this does not re-check.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn is_blocked_slot(&self) -> bool {
        self.kind == BLOCKED_SLOT
    }
}

/// Appointments keyed by calendar day (`YYYY-MM-DD`).
pub type AppointmentsByDate = BTreeMap<NaiveDate, Vec<Appointment>>;

/// Parse a JSON snapshot of the form `{"2024-01-10": [ {...}, ... ], ...}`.
///
/// Date keys go through [`parse_date`], the same strict `YYYY-MM-DD` check
/// applied to query dates. Every appointment in the document is validated,
/// including ones on other days or for other psychologists, so a single bad
/// entry anywhere rejects the whole snapshot.
///
/// # Errors
/// - `AgendaError::Snapshot` if the JSON is malformed or an appointment carries
///   a time that is not `HH:mm` or an unknown status.
/// - `AgendaError::InvalidDate` if a key is not exactly `YYYY-MM-DD`.
/// - `AgendaError::DuplicateDate` if the same day appears under two keys.
pub fn parse_snapshot(json: &str) -> Result<AppointmentsByDate> {
    let RawSnapshot(days) = serde_json::from_str(json)?;

    let mut snapshot = AppointmentsByDate::new();
    for (key, appointments) in days {
        let date = parse_date(&key)?;
        match snapshot.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(appointments);
            }
            Entry::Occupied(_) => return Err(AgendaError::DuplicateDate(key)),
        }
    }
    Ok(snapshot)
}

/// Snapshot entries in document order, keys untouched.
///
/// Deserializing straight into a map would let a repeated key silently
/// replace the earlier day's appointments.
struct RawSnapshot(Vec<(String, Vec<Appointment>)>);

impl<'de> Deserialize<'de> for RawSnapshot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping YYYY-MM-DD keys to appointment lists")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<Appointment>>()? {
                    entries.push(entry);
                }
                Ok(RawSnapshot(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
