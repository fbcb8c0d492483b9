//! Notification messages for the parties of a booking.

use crate::directory::RecordId;
use crate::error::{BookingError, RecordKind};
use crate::roles::{Doctor, Identity, Patient, Receptionist};
use serde::Serialize;

/// A borrowed view of any role, used for dispatch
#[derive(Debug, Clone, Copy)]
pub enum Role<'a> {
    #[allow(dead_code)] // the booking flow only notifies concrete roles
    User(&'a Identity),
    Patient(&'a Patient),
    Doctor(&'a Doctor),
    Receptionist(&'a Receptionist),
}

/// Role tag carried on a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    User,
    Patient,
    Doctor,
    Receptionist,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Receptionist => "receptionist",
        }
    }
}

impl<'a> Role<'a> {
    pub fn identity(&self) -> &'a Identity {
        match *self {
            Role::User(identity) => identity,
            Role::Patient(p) => &p.identity,
            Role::Doctor(d) => &d.identity,
            Role::Receptionist(r) => &r.identity,
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            Role::User(_) => RoleKind::User,
            Role::Patient(_) => RoleKind::Patient,
            Role::Doctor(_) => RoleKind::Doctor,
            Role::Receptionist(_) => RoleKind::Receptionist,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Role::User(identity) => identity.describe(),
            Role::Patient(p) => p.describe(),
            Role::Doctor(d) => d.describe(),
            Role::Receptionist(r) => r.describe(),
        }
    }
}

/// A rendered notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub recipient: String,
    pub role: RoleKind,
    pub appointment_id: Option<RecordId>,
    pub body: String,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}

fn empty_history(kind: RecordKind, identity: &Identity) -> BookingError {
    BookingError::EmptyAppointmentHistory {
        role: kind,
        id: identity.id,
    }
}

/// Build the notification for a role.
///
/// Messages reference the most recently appended appointment, not the one
/// with the latest date.
pub fn notify(role: Role<'_>) -> Result<Message, BookingError> {
    let identity = role.identity();
    let recipient = identity.full_name();

    let (appointment_id, body) = match role {
        Role::User(_) => (
            None,
            format!("Hello {}, you have a new medical appointment.", recipient),
        ),
        Role::Patient(patient) => {
            let last = patient
                .appointments()
                .last()
                .ok_or_else(|| empty_history(RecordKind::Patient, identity))?;
            (
                Some(last.id()),
                format!(
                    "Hello {}, you have a new medical appointment scheduled on {} with doctor {}.",
                    recipient,
                    last.short_date(),
                    last.doctor_name()
                ),
            )
        }
        Role::Doctor(doctor) => {
            let last = doctor
                .pending_appointments()
                .last()
                .ok_or_else(|| empty_history(RecordKind::Doctor, identity))?;
            (
                Some(last.id()),
                format!(
                    "Hello Dr. {}, you have a new medical appointment scheduled on {} with patient {}.",
                    recipient,
                    last.short_date(),
                    last.patient_name()
                ),
            )
        }
        Role::Receptionist(receptionist) => {
            let last = receptionist
                .pending_appointments()
                .last()
                .ok_or_else(|| empty_history(RecordKind::Receptionist, identity))?;
            (
                Some(last.id()),
                format!(
                    "Hello {}, you have a new medical appointment to manage on {}.",
                    recipient,
                    last.short_date()
                ),
            )
        }
    };

    Ok(Message {
        recipient,
        role: role.kind(),
        appointment_id,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::Appointment;
    use crate::roles::tests::{sample_doctor, sample_patient, sample_receptionist};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_notify_patient_references_last_booking() {
        let doctor = sample_doctor();
        let mut patient = sample_patient();
        let appt = Appointment::new(5, ymd(2024, 1, 10), "Neurologia", &doctor, &patient);
        patient.add_appointment(appt);

        let msg = notify(Role::Patient(&patient)).unwrap();
        assert_eq!(msg.role, RoleKind::Patient);
        assert_eq!(msg.appointment_id, Some(5));
        assert!(msg.body.contains("Juan Cruz"));
        assert!(msg.body.contains("2024-01-10"));
        assert!(msg.body.contains("Jose Perez Gonzalez"));
    }

    #[test]
    fn test_notify_uses_booking_order_not_date() {
        let mut doctor = sample_doctor();
        let patient = sample_patient();
        let late = Appointment::new(1, ymd(2025, 12, 31), "A", &doctor, &patient);
        let early = Appointment::new(2, ymd(2024, 2, 1), "B", &doctor, &patient);
        doctor.add_pending_appointment(late);
        doctor.add_pending_appointment(early);

        let msg = notify(Role::Doctor(&doctor)).unwrap();
        assert_eq!(msg.appointment_id, Some(2));
        assert!(msg.body.starts_with("Hello Dr. Jose Perez Gonzalez"));
        assert!(msg.body.contains("2024-02-01"));
        assert!(msg.body.contains("with patient Juan Cruz"));
    }

    #[test]
    fn test_notify_receptionist_omits_counterpart() {
        let mut receptionist = sample_receptionist();
        let appt = Appointment::new(
            3,
            ymd(2024, 3, 3),
            "Pediatria",
            &sample_doctor(),
            &sample_patient(),
        );
        receptionist.add_pending_appointment(appt);

        let msg = notify(Role::Receptionist(&receptionist)).unwrap();
        assert_eq!(
            msg.body,
            "Hello Laura Fernandez, you have a new medical appointment to manage on 2024-03-03."
        );
        assert!(!msg.body.contains("Juan"));
    }

    #[test]
    fn test_notify_empty_history_is_an_error() {
        let err = notify(Role::Patient(&sample_patient())).unwrap_err();
        assert_eq!(
            err,
            BookingError::EmptyAppointmentHistory {
                role: RecordKind::Patient,
                id: 1
            }
        );
        assert!(notify(Role::Doctor(&sample_doctor())).is_err());
        assert!(notify(Role::Receptionist(&sample_receptionist())).is_err());
    }

    #[test]
    fn test_notify_bare_user() {
        let patient = sample_patient();
        let msg = notify(Role::User(&patient.identity)).unwrap();
        assert_eq!(msg.role, RoleKind::User);
        assert_eq!(msg.appointment_id, None);
        assert_eq!(
            msg.to_string(),
            "Hello Juan Cruz, you have a new medical appointment."
        );
    }

    #[test]
    fn test_role_describe_dispatch() {
        let doctor = sample_doctor();
        assert_eq!(Role::Doctor(&doctor).describe(), doctor.describe());
        assert_eq!(Role::Doctor(&doctor).kind().as_str(), "doctor");
    }
}
