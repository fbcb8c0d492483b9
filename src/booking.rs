//! Booking: link a new appointment to its patient, doctor and receptionist.
//!
//! All lookups happen before anything is appended, so a failed booking leaves
//! the directory as it was.

use crate::appointment::Appointment;
use crate::directory::{Directory, RecordId};
use crate::error::{BookingError, RecordKind};
use crate::notify::{notify, Message, Role};
use chrono::NaiveDate;

/// Rule choosing which receptionist manages a new booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceptionistPolicy {
    /// Lowest receptionist id
    #[default]
    First,
    /// Fewest pending appointments, ties broken by lowest id
    LeastLoaded,
    /// Always the given receptionist
    Fixed(RecordId),
}

impl ReceptionistPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "first" => Some(Self::First),
            "least-loaded" | "least_loaded" | "leastloaded" => Some(Self::LeastLoaded),
            _ => s
                .strip_prefix("id:")
                .and_then(|id| id.trim().parse().ok())
                .map(Self::Fixed),
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Self::First => "first".to_string(),
            Self::LeastLoaded => "least-loaded".to_string(),
            Self::Fixed(id) => format!("id:{}", id),
        }
    }

    /// Pick a receptionist id from the directory
    pub fn assign(&self, directory: &Directory) -> Result<RecordId, BookingError> {
        let none_available = || BookingError::not_found(RecordKind::Receptionist, 0);
        match self {
            Self::First => directory
                .receptionists()
                .next()
                .map(|r| r.id())
                .ok_or_else(none_available),
            Self::LeastLoaded => directory
                .receptionists()
                .min_by_key(|r| (r.pending_appointments().len(), r.id()))
                .map(|r| r.id())
                .ok_or_else(none_available),
            Self::Fixed(id) => directory.receptionist(*id).map(|r| r.id()),
        }
    }
}

/// Fields collected for a new appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub appointment_id: RecordId,
    pub date: NaiveDate,
    pub specialty: String,
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
}

/// Outcome of a successful booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub appointment: Appointment,
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
    pub receptionist_id: RecordId,
}

/// Create the appointment and append it to every party's list.
pub fn book(
    directory: &mut Directory,
    policy: ReceptionistPolicy,
    request: BookingRequest,
) -> Result<Booking, BookingError> {
    if directory.has_appointment(request.appointment_id) {
        return Err(BookingError::DuplicateRecord {
            kind: RecordKind::Appointment,
            id: request.appointment_id,
        });
    }

    let patient = directory.patient(request.patient_id)?;
    let doctor = directory.doctor(request.doctor_id)?;
    let receptionist_id = policy.assign(directory)?;

    let appointment = Appointment::new(
        request.appointment_id,
        request.date,
        request.specialty,
        doctor,
        patient,
    );

    directory
        .patient_mut(request.patient_id)?
        .add_appointment(appointment.clone());
    directory
        .doctor_mut(request.doctor_id)?
        .add_pending_appointment(appointment.clone());
    directory
        .receptionist_mut(receptionist_id)?
        .add_pending_appointment(appointment.clone());
    directory.insert_appointment(appointment.clone())?;

    Ok(Booking {
        appointment,
        patient_id: request.patient_id,
        doctor_id: request.doctor_id,
        receptionist_id,
    })
}

/// Messages for patient, doctor and receptionist, in that order
pub fn notify_parties(directory: &Directory, booking: &Booking) -> Result<Vec<Message>, BookingError> {
    Ok(vec![
        notify(Role::Patient(directory.patient(booking.patient_id)?))?,
        notify(Role::Doctor(directory.doctor(booking.doctor_id)?))?,
        notify(Role::Receptionist(
            directory.receptionist(booking.receptionist_id)?,
        ))?,
    ])
}
