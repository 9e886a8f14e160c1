//! Error types for agenda-engine operations.

use thiserror::Error;

use crate::permissions::{Action, Role};

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Invalid time '{0}': expected zero-padded HH:mm")]
    InvalidTime(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time range: start {start} must be before end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Role {role} is not allowed to {action}")]
    PermissionDenied { role: Role, action: Action },

    #[error("User {user_id} cannot act on the agenda of psychologist {psychologist_id}")]
    ForeignAgenda {
        user_id: String,
        psychologist_id: String,
    },

    #[error("Snapshot lists day {0} more than once")]
    DuplicateDate(String),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgendaError>;
