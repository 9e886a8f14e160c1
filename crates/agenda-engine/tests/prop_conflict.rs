//! Property-based tests for conflict detection using proptest.
//!
//! These check invariants that should hold for *any* agenda, not just the
//! hand-picked scenarios in `conflict_tests.rs`.

use agenda_engine::appointment::{Appointment, AppointmentStatus, AppointmentsByDate};
use agenda_engine::conflict::find_schedule_conflicts;
use agenda_engine::freebusy::find_free_slots;
use agenda_engine::{has_schedule_conflict, TimeRange};
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A well-formed range on a 15-minute grid between 06:00 and 22:00.
fn arb_range() -> impl Strategy<Value = TimeRange> {
    (24u32..88, 1u32..=16).prop_map(|(start_q, len_q)| {
        let end_q = (start_q + len_q).min(88);
        TimeRange::new(quarter(start_q), quarter(end_q)).unwrap()
    })
}

fn arb_status() -> impl Strategy<Value = AppointmentStatus> {
    prop_oneof![
        Just(AppointmentStatus::Scheduled),
        Just(AppointmentStatus::Completed),
        Just(AppointmentStatus::CancelledByPatient),
        Just(AppointmentStatus::CancelledByClinic),
        Just(AppointmentStatus::NoShow),
    ]
}

fn arb_psychologist() -> impl Strategy<Value = String> {
    prop_oneof![Just("p1".to_string()), Just("p2".to_string())]
}

fn arb_kind() -> impl Strategy<Value = String> {
    prop_oneof![Just("Session".to_string()), Just("Blocked Slot".to_string())]
}

fn arb_appointment() -> impl Strategy<Value = Appointment> {
    (arb_psychologist(), arb_range(), arb_status(), arb_kind()).prop_map(
        |(psychologist_id, range, status, kind)| Appointment {
            id: None,
            patient_id: None,
            psychologist_id,
            start_time: range.start,
            end_time: range.end,
            status,
            kind,
        },
    )
}

fn arb_day() -> impl Strategy<Value = Vec<Appointment>> {
    prop::collection::vec(arb_appointment(), 0..12)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn quarter(q: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(q / 4, (q % 4) * 15, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn on_day(date: NaiveDate, appointments: Vec<Appointment>) -> AppointmentsByDate {
    let mut map = AppointmentsByDate::new();
    map.insert(date, appointments);
    map
}

/// Reference predicate written straight from the definition of a conflict.
fn reference(appointments: &[Appointment], proposed: TimeRange, psychologist: &str) -> bool {
    appointments.iter().any(|a| {
        a.psychologist_id == psychologist
            && !a.status.is_cancelled()
            && proposed.start < a.end_time
            && a.start_time < proposed.end
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn matches_half_open_reference(
        appointments in arb_day(),
        proposed in arb_range(),
        psychologist in arb_psychologist(),
        block in any::<bool>(),
    ) {
        let expected = reference(&appointments, proposed, &psychologist);
        let snapshot = on_day(day(), appointments);
        prop_assert_eq!(
            has_schedule_conflict(&snapshot, day(), proposed, &psychologist, block),
            expected
        );
    }

    #[test]
    fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert_eq!(a.overlaps(&b), a.start < b.end && b.start < a.end);
    }

    #[test]
    fn other_days_never_conflict(appointments in arb_day(), proposed in arb_range()) {
        let other = day().succ_opt().unwrap();
        let snapshot = on_day(other, appointments);
        prop_assert!(!has_schedule_conflict(&snapshot, day(), proposed, "p1", false));
    }

    #[test]
    fn cancelled_never_conflicts(appointments in arb_day(), proposed in arb_range()) {
        let cancelled: Vec<Appointment> = appointments
            .into_iter()
            .map(|a| Appointment { status: AppointmentStatus::CancelledByClinic, ..a })
            .collect();
        let snapshot = on_day(day(), cancelled);
        prop_assert!(!has_schedule_conflict(&snapshot, day(), proposed, "p1", false));
        prop_assert!(!has_schedule_conflict(&snapshot, day(), proposed, "p2", false));
    }

    #[test]
    fn foreign_psychologist_never_conflicts(appointments in arb_day(), proposed in arb_range()) {
        let snapshot = on_day(day(), appointments);
        prop_assert!(!has_schedule_conflict(&snapshot, day(), proposed, "p3", false));
    }

    #[test]
    fn block_flag_is_inert(appointments in arb_day(), proposed in arb_range()) {
        let snapshot = on_day(day(), appointments);
        prop_assert_eq!(
            has_schedule_conflict(&snapshot, day(), proposed, "p1", true),
            has_schedule_conflict(&snapshot, day(), proposed, "p1", false)
        );
    }

    #[test]
    fn find_agrees_with_has(appointments in arb_day(), proposed in arb_range()) {
        let snapshot = on_day(day(), appointments);
        let conflicts = find_schedule_conflicts(&snapshot, day(), proposed, "p1", false);
        prop_assert_eq!(
            !conflicts.is_empty(),
            has_schedule_conflict(&snapshot, day(), proposed, "p1", false)
        );
        for c in &conflicts {
            prop_assert!(c.overlap_minutes > 0);
        }
    }

    #[test]
    fn free_slots_are_conflict_free(appointments in arb_day()) {
        let snapshot = on_day(day(), appointments);
        let window = TimeRange::new(quarter(24), quarter(88)).unwrap();
        for slot in find_free_slots(&snapshot, day(), "p1", window) {
            prop_assert!(!has_schedule_conflict(&snapshot, day(), slot.range(), "p1", false));
        }
    }
}
