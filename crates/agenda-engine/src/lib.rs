//! # agenda-engine
//!
//! Booking-time logic for a clinic agenda.
//!
//! The engine answers one question precisely: does a proposed appointment
//! collide with a psychologist's existing, non-cancelled appointments on the
//! same day? Around that predicate it offers free-slot computation and the
//! static role/action permission table consulted before a booking is written.
//!
//! Everything here is a pure, synchronous function over a caller-supplied
//! snapshot. Making check-then-write atomic against a shared store is the
//! caller's job.
//!
//! ## Modules
//!
//! - [`appointment`] — Appointment records and the by-date snapshot
//! - [`time`] — `HH:mm` parsing and half-open [`TimeRange`]s
//! - [`conflict`] — Conflict detection for a proposed booking
//! - [`freebusy`] — Free slots for one psychologist on one day
//! - [`permissions`] — Role/action table and the explicit [`Session`] context
//! - [`error`] — Error types

pub mod appointment;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod permissions;
pub mod time;

pub use appointment::{parse_snapshot, Appointment, AppointmentStatus, AppointmentsByDate};
pub use conflict::{check_booking, find_schedule_conflicts, has_schedule_conflict};
pub use error::AgendaError;
pub use freebusy::{find_first_free_slot, find_free_slots, FreeSlot};
pub use permissions::{has_permission, Action, Role, Session};
pub use time::TimeRange;
