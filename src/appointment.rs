//! Appointments linking a patient to a doctor.

use crate::directory::RecordId;
use crate::roles::{Doctor, Patient};
use chrono::NaiveDate;
use serde::Serialize;

/// Short date format used in every rendered line and message
pub const SHORT_DATE: &str = "%Y-%m-%d";

/// A booked appointment.
///
/// Patient and doctor names are copied when the appointment is created. Later
/// edits to either role are intentionally not reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    id: RecordId,
    date: NaiveDate,
    specialty: String,
    patient_name: String,
    doctor_name: String,
}

impl Appointment {
    pub fn new(
        id: RecordId,
        date: NaiveDate,
        specialty: impl Into<String>,
        doctor: &Doctor,
        patient: &Patient,
    ) -> Self {
        Self {
            id,
            date,
            specialty: specialty.into(),
            patient_name: patient.identity.full_name(),
            doctor_name: doctor.identity.full_name(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn short_date(&self) -> String {
        self.date.format(SHORT_DATE).to_string()
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn doctor_name(&self) -> &str {
        &self.doctor_name
    }

    pub fn describe(&self) -> String {
        format!(
            "Appointment {}, Date: {}, Specialty: {}, Patient: {}, Doctor: {}",
            self.id,
            self.short_date(),
            self.specialty,
            self.patient_name,
            self.doctor_name
        )
    }
}

impl std::fmt::Display for Appointment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
