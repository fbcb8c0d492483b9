//! People and places known to the clinic.
//!
//! Every human role shares an [`Identity`] and adds its own fields plus an
//! append-only list of appointments. Nothing here validates attribute
//! content; callers are responsible for well-formed values.

use crate::appointment::Appointment;
use crate::directory::RecordId;
use serde::{Deserialize, Serialize};

/// Identity fields shared by every role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub id: RecordId,
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub age: i32,
}

impl Identity {
    pub fn new(
        id: RecordId,
        name: &str,
        last_name: &str,
        national_id: &str,
        phone: &str,
        email: &str,
        age: i32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            last_name: last_name.to_string(),
            national_id: national_id.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            age,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn describe(&self) -> String {
        format!(
            "Id: {}, Name: {}, National ID: {}, Phone: {}, Email: {}, Age: {}",
            self.id,
            self.full_name(),
            self.national_id,
            self.phone,
            self.email,
            self.age
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub identity: Identity,
    pub record_number: String,
    appointments: Vec<Appointment>,
}

impl Patient {
    pub fn new(identity: Identity, record_number: &str) -> Self {
        Self {
            identity,
            record_number: record_number.to_string(),
            appointments: Vec::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.identity.id
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    /// Appointments in booking order
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn describe(&self) -> String {
        format!(
            "{}, Clinical record: {}",
            self.identity.describe(),
            self.record_number
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub identity: Identity,
    pub specialty: String,
    pub graduated_from: String,
    pub license_number: String,
    pub years_of_experience: i32,
    pending: Vec<Appointment>,
}

impl Doctor {
    pub fn new(
        identity: Identity,
        specialty: &str,
        graduated_from: &str,
        license_number: &str,
        years_of_experience: i32,
    ) -> Self {
        Self {
            identity,
            specialty: specialty.to_string(),
            graduated_from: graduated_from.to_string(),
            license_number: license_number.to_string(),
            years_of_experience,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.identity.id
    }

    pub fn add_pending_appointment(&mut self, appointment: Appointment) {
        self.pending.push(appointment);
    }

    pub fn pending_appointments(&self) -> &[Appointment] {
        &self.pending
    }

    pub fn describe(&self) -> String {
        format!(
            "{}, Specialty: {}, Graduated from: {}, License: {}, Years of experience: {}",
            self.identity.describe(),
            self.specialty,
            self.graduated_from,
            self.license_number,
            self.years_of_experience
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receptionist {
    pub identity: Identity,
    pub schedule: String,
    pub area: String,
    pending: Vec<Appointment>,
}

impl Receptionist {
    pub fn new(identity: Identity, schedule: &str, area: &str) -> Self {
        Self {
            identity,
            schedule: schedule.to_string(),
            area: area.to_string(),
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.identity.id
    }

    pub fn add_pending_appointment(&mut self, appointment: Appointment) {
        self.pending.push(appointment);
    }

    pub fn pending_appointments(&self) -> &[Appointment] {
        &self.pending
    }

    pub fn describe(&self) -> String {
        format!(
            "{}, Schedule: {}, Area: {}",
            self.identity.describe(),
            self.schedule,
            self.area
        )
    }
}

/// A hospital. Listed for reference only; appointments never point at one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hospital {
    pub id: RecordId,
    pub name: String,
    pub address: String,
}

impl Hospital {
    pub fn new(id: RecordId, name: &str, address: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    pub fn describe(&self) -> String {
        format!("Id: {}, Name: {}, Address: {}", self.id, self.name, self.address)
    }
}
