//! Domain errors for directory lookups, input parsing and notifications.

use crate::directory::RecordId;
use thiserror::Error;

/// Kind of record held in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Doctor,
    Receptionist,
    Hospital,
    Appointment,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Receptionist => "receptionist",
            Self::Hospital => "hospital",
            Self::Appointment => "appointment",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("invalid {field}: '{value}'")]
    InvalidInput { field: &'static str, value: String },

    #[error("{kind} with id {id} was not found")]
    RecordNotFound { kind: RecordKind, id: RecordId },

    #[error("{role} {id} has no appointments to notify about")]
    EmptyAppointmentHistory { role: RecordKind, id: RecordId },

    #[error("{kind} with id {id} already exists")]
    DuplicateRecord { kind: RecordKind, id: RecordId },
}

impl BookingError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
        }
    }

    pub fn not_found(kind: RecordKind, id: RecordId) -> Self {
        Self::RecordNotFound { kind, id }
    }

    /// Short machine-readable code, used in transcript events
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::RecordNotFound { .. } => "record_not_found",
            Self::EmptyAppointmentHistory { .. } => "empty_appointment_history",
            Self::DuplicateRecord { .. } => "duplicate_record",
        }
    }
}
