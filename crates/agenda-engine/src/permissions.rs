//! Role-based permissions and the per-request session context.
//!
//! `has_permission` is a static `(role, action)` table with no hidden state.
//! Callers that act on behalf of a signed-in user build a [`Session`] and pass
//! it explicitly instead of reading ambient auth state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Psychologist,
    Secretary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ViewSchedule,
    BookAppointment,
    BlockTime,
    CancelAppointment,
    ViewPatientRecords,
    EditPatientRecords,
    ViewReports,
    ManageUsers,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Psychologist, Role::Secretary];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Psychologist => "psychologist",
            Role::Secretary => "secretary",
        }
    }
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::ViewSchedule,
        Action::BookAppointment,
        Action::BlockTime,
        Action::CancelAppointment,
        Action::ViewPatientRecords,
        Action::EditPatientRecords,
        Action::ViewReports,
        Action::ManageUsers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::ViewSchedule => "view-schedule",
            Action::BookAppointment => "book-appointment",
            Action::BlockTime => "block-time",
            Action::CancelAppointment => "cancel-appointment",
            Action::ViewPatientRecords => "view-patient-records",
            Action::EditPatientRecords => "edit-patient-records",
            Action::ViewReports => "view-reports",
            Action::ManageUsers => "manage-users",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AgendaError::UnknownRole(s.to_string()))
    }
}

impl FromStr for Action {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AgendaError::UnknownAction(s.to_string()))
    }
}

/// Whether `role` may perform `action`.
pub fn has_permission(role: Role, action: Action) -> bool {
    use Action::*;

    match role {
        Role::Admin => true,
        Role::Psychologist => !matches!(action, ManageUsers),
        Role::Secretary => matches!(
            action,
            ViewSchedule | BookAppointment | BlockTime | CancelAppointment
        ),
    }
}

/// The signed-in user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    /// Set when the user is a practitioner with their own agenda.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<String>,
}

impl Session {
    pub fn can(&self, action: Action) -> bool {
        has_permission(self.role, action)
    }

    /// # Errors
    /// Returns `AgendaError::PermissionDenied` if the session's role lacks `action`.
    pub fn require(&self, action: Action) -> Result<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(AgendaError::PermissionDenied {
                role: self.role,
                action,
            })
        }
    }

    /// Check that this session may book (or block, when `is_block_time`) on the
    /// agenda of `psychologist_id`.
    ///
    /// Psychologists only manage their own agenda; secretaries and admins may
    /// act on anyone's.
    pub fn authorize_booking(&self, psychologist_id: &str, is_block_time: bool) -> Result<()> {
        let action = if is_block_time {
            Action::BlockTime
        } else {
            Action::BookAppointment
        };
        self.require(action)?;

        if self.role == Role::Psychologist
            && self.psychologist_id.as_deref() != Some(psychologist_id)
        {
            return Err(AgendaError::ForeignAgenda {
                user_id: self.user_id.clone(),
                psychologist_id: psychologist_id.to_string(),
            });
        }
        Ok(())
    }
}
