//! Tests for appointment documents and snapshot parsing.

use agenda_engine::appointment::{parse_snapshot, Appointment, AppointmentStatus};
use agenda_engine::{check_booking, AgendaError};
use chrono::NaiveDate;

#[test]
fn only_cancelled_variants_are_cancelled() {
    assert!(AppointmentStatus::CancelledByPatient.is_cancelled());
    assert!(AppointmentStatus::CancelledByClinic.is_cancelled());
    assert!(!AppointmentStatus::Scheduled.is_cancelled());
    assert!(!AppointmentStatus::Completed.is_cancelled());
    assert!(!AppointmentStatus::NoShow.is_cancelled());
}

#[test]
fn deserializes_front_end_document() {
    let json = r#"{
        "id": "a1",
        "patientId": "pt-7",
        "psychologistId": "p1",
        "startTime": "09:00",
        "endTime": "10:00",
        "status": "cancelled-by-clinic",
        "type": "Blocked Slot"
    }"#;
    let appt: Appointment = serde_json::from_str(json).unwrap();

    assert_eq!(appt.id.as_deref(), Some("a1"));
    assert_eq!(appt.psychologist_id, "p1");
    assert_eq!(appt.status, AppointmentStatus::CancelledByClinic);
    assert!(appt.is_blocked_slot());
    assert_eq!(appt.range().duration_minutes(), 60);
}

#[test]
fn status_and_type_have_defaults() {
    let json = r#"{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}"#;
    let appt: Appointment = serde_json::from_str(json).unwrap();
    assert_eq!(appt.status, AppointmentStatus::Scheduled);
    assert!(!appt.is_blocked_slot());
}

#[test]
fn serializes_with_front_end_field_names() {
    let json = r#"{"psychologistId":"p1","startTime":"09:00","endTime":"10:00","status":"no-show","type":"Session"}"#;
    let appt: Appointment = serde_json::from_str(json).unwrap();
    assert_eq!(serde_json::to_string(&appt).unwrap(), json);
}

#[test]
fn parses_snapshot_by_date() {
    let json = r#"{
        "2024-01-10": [
            {"psychologistId":"p1","startTime":"09:00","endTime":"10:00","status":"scheduled"},
            {"psychologistId":"p2","startTime":"09:00","endTime":"10:00","status":"completed"}
        ],
        "2024-01-11": []
    }"#;
    let snapshot = parse_snapshot(json).unwrap();

    assert_eq!(snapshot.len(), 2);
    let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    assert_eq!(snapshot[&day].len(), 2);
}

#[test]
fn snapshot_with_malformed_time_is_rejected() {
    let json = r#"{"2024-01-10":[{"psychologistId":"p1","startTime":"9:00","endTime":"10:00"}]}"#;
    assert!(matches!(parse_snapshot(json), Err(AgendaError::Snapshot(_))));
}

#[test]
fn snapshot_with_unknown_status_is_rejected() {
    let json = r#"{"2024-01-10":[{"psychologistId":"p1","startTime":"09:00","endTime":"10:00","status":"cancelled"}]}"#;
    assert!(parse_snapshot(json).is_err());
}

#[test]
fn snapshot_rejects_unpadded_date_key() {
    let json = r#"{"2024-1-10":[{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}]}"#;
    assert!(matches!(
        parse_snapshot(json),
        Err(AgendaError::InvalidDate(ref key)) if key == "2024-1-10"
    ));
}

#[test]
fn snapshot_rejects_same_day_under_two_keys() {
    // Both keys name 2024-01-10; the second must not replace the booked day.
    let json = r#"{
        "2024-01-10": [{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}],
        "2024-1-10": []
    }"#;
    assert!(parse_snapshot(json).is_err());
}

#[test]
fn snapshot_rejects_repeated_identical_key() {
    let json = r#"{
        "2024-01-10": [{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}],
        "2024-01-10": []
    }"#;
    assert!(matches!(
        parse_snapshot(json),
        Err(AgendaError::DuplicateDate(ref key)) if key == "2024-01-10"
    ));
}

#[test]
fn multi_day_snapshot_keeps_booked_day() {
    let json = r#"{
        "2024-01-09": [],
        "2024-01-10": [{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}],
        "2024-01-11": []
    }"#;
    let snapshot = parse_snapshot(json).unwrap();
    assert!(check_booking(&snapshot, "2024-01-10", "09:30", "10:30", "p1", false).unwrap());
}

#[test]
fn bad_entry_on_unrelated_day_rejects_snapshot() {
    let json = r#"{
        "2023-05-01": [{"psychologistId":"p9","startTime":"9:00","endTime":"10:00"}],
        "2024-01-10": [{"psychologistId":"p1","startTime":"09:00","endTime":"10:00"}]
    }"#;
    assert!(matches!(parse_snapshot(json), Err(AgendaError::Snapshot(_))));
}
