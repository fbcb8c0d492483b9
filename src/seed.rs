//! Seed data: the built-in demo clinic, or a TOML seed file.
//!
//! Seed appointments are added to the catalog only; they do not appear in
//! any patient's or doctor's list.

use crate::appointment::Appointment;
use crate::directory::{Directory, RecordId};
use crate::error::BookingError;
use crate::roles::{Doctor, Hospital, Identity, Patient, Receptionist};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PatientSeed {
    #[serde(flatten)]
    pub identity: Identity,
    pub record_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSeed {
    #[serde(flatten)]
    pub identity: Identity,
    pub specialty: String,
    pub graduated_from: String,
    pub license_number: String,
    pub years_of_experience: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceptionistSeed {
    #[serde(flatten)]
    pub identity: Identity,
    pub schedule: String,
    pub area: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentSeed {
    pub id: RecordId,
    pub date: NaiveDate,
    pub specialty: String,
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
}

/// Contents of a seed file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub patients: Vec<PatientSeed>,
    #[serde(default)]
    pub doctors: Vec<DoctorSeed>,
    #[serde(default)]
    pub receptionists: Vec<ReceptionistSeed>,
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
    #[serde(default)]
    pub appointments: Vec<AppointmentSeed>,
}

impl SeedFile {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let seed: SeedFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;
        Ok(seed)
    }

    /// Build a directory. Appointments must reference seeded patients and doctors.
    pub fn into_directory(self) -> Result<Directory, BookingError> {
        let mut dir = Directory::new();

        for p in self.patients {
            dir.insert_patient(Patient::new(p.identity, &p.record_number))?;
        }
        for d in self.doctors {
            dir.insert_doctor(Doctor::new(
                d.identity,
                &d.specialty,
                &d.graduated_from,
                &d.license_number,
                d.years_of_experience,
            ))?;
        }
        for r in self.receptionists {
            dir.insert_receptionist(Receptionist::new(r.identity, &r.schedule, &r.area))?;
        }
        for h in self.hospitals {
            dir.insert_hospital(h)?;
        }
        for a in self.appointments {
            let appointment = Appointment::new(
                a.id,
                a.date,
                a.specialty,
                dir.doctor(a.doctor_id)?,
                dir.patient(a.patient_id)?,
            );
            dir.insert_appointment(appointment)?;
        }

        Ok(dir)
    }
}

/// Load the directory from a seed file, or the built-in clinic when none is given
pub fn load(path: Option<&Path>) -> Result<Directory> {
    match path {
        Some(path) => Ok(SeedFile::load_from(path)?.into_directory()?),
        None => Ok(builtin()?),
    }
}

/// The four-of-everything demo clinic
pub fn builtin() -> Result<Directory, BookingError> {
    let mut dir = Directory::new();

    let patients = [
        (1, "Juan", "Cruz", "12345678", "7777767", "987654321", 30, "H12345"),
        (2, "Maria", "Lopez", "87654321", "8888877", "923456789", 25, "H54321"),
        (3, "Pedro", "Gomez", "11223344", "9999988", "912345678", 40, "H67890"),
        (4, "Ana", "Martinez", "44332211", "6666655", "901234567", 35, "H09876"),
    ];
    for (id, name, last, dni, phone, email, age, record) in patients {
        dir.insert_patient(Patient::new(
            Identity::new(id, name, last, dni, phone, email, age),
            record,
        ))?;
    }

    let doctors = [
        (1, "Jose", "Perez Gonzalez", "12345678", "7777767", "987654321", 45,
         "Cardiologia", "Universidad Nacional", "D12345", 53),
        (2, "Juan", "Hernandez Cuña", "87654321", "8888877", "923456789", 38,
         "Pediatria", "Universidad Estatal", "D54321", 34),
        (3, "Ramon", "Torres Lopez", "11223344", "9999988", "912345678", 50,
         "Dermatologia", "Universidad Privada", "D67890", 32),
        (4, "Maria", "Sanchez Martinez", "44332211", "6666655", "901234567", 42,
         "Ginecologia", "Universidad Tecnologica", "D09876", 43),
    ];
    for (id, name, last, dni, phone, email, age, specialty, school, license, years) in doctors {
        dir.insert_doctor(Doctor::new(
            Identity::new(id, name, last, dni, phone, email, age),
            specialty,
            school,
            license,
            years,
        ))?;
    }

    let receptionists = [
        (1, "Laura", "Fernandez", "12345678", "7777767", "987654321", 28,
         "Lunes a Viernes 8am - 5pm", "Atencion al Cliente"),
        (2, "Carlos", "Gonzalez", "87654321", "8888877", "923456789", 30,
         "Lunes a Sabado 9am - 6pm", "Administracion"),
        (3, "Sofia", "Lopez", "11223344", "9999988", "912345678", 26,
         "Martes a Domingo 10am - 7pm", "Recepcion"),
        (4, "Miguel", "Martinez", "44332211", "6666655", "901234567", 32,
         "Lunes a Viernes 8am - 4pm", "Coordinacion"),
    ];
    for (id, name, last, dni, phone, email, age, schedule, area) in receptionists {
        dir.insert_receptionist(Receptionist::new(
            Identity::new(id, name, last, dni, phone, email, age),
            schedule,
            area,
        ))?;
    }

    let appointments = [
        (1, (2023, 10, 1), "Cardiologia"),
        (2, (2023, 10, 2), "Pediatria"),
        (3, (2023, 10, 3), "Dermatologia"),
        (4, (2023, 10, 4), "Ginecologia"),
    ];
    for (id, (y, m, d), specialty) in appointments {
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| BookingError::invalid("seed date", format!("{}-{}-{}", y, m, d)))?;
        // appointment n pairs doctor n with patient n
        let appointment = Appointment::new(id, date, specialty, dir.doctor(id)?, dir.patient(id)?);
        dir.insert_appointment(appointment)?;
    }

    let hospitals = [
        (1, "Hospital Central", "Av. Principal 123"),
        (2, "Clinica Santa Maria", "Calle Secundaria 456"),
        (3, "Hospital San Juan", "Avenida Terciaria 789"),
        (4, "Clinica Esperanza", "Calle Cuarta 101"),
    ];
    for (id, name, address) in hospitals {
        dir.insert_hospital(Hospital::new(id, name, address))?;
    }

    Ok(dir)
}
