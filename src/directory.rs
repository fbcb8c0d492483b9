//! In-memory directory of every record known to a session.
//!
//! Records are keyed by id per kind. Iteration is in ascending id order.

use crate::appointment::Appointment;
use crate::error::{BookingError, RecordKind};
use crate::roles::{Doctor, Hospital, Patient, Receptionist};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub type RecordId = u32;

fn insert_unique<T>(
    map: &mut BTreeMap<RecordId, T>,
    kind: RecordKind,
    id: RecordId,
    record: T,
) -> Result<(), BookingError> {
    match map.entry(id) {
        Entry::Occupied(_) => Err(BookingError::DuplicateRecord { kind, id }),
        Entry::Vacant(slot) => {
            slot.insert(record);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    patients: BTreeMap<RecordId, Patient>,
    doctors: BTreeMap<RecordId, Doctor>,
    receptionists: BTreeMap<RecordId, Receptionist>,
    hospitals: BTreeMap<RecordId, Hospital>,
    appointments: BTreeMap<RecordId, Appointment>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_patient(&mut self, patient: Patient) -> Result<(), BookingError> {
        insert_unique(&mut self.patients, RecordKind::Patient, patient.id(), patient)
    }

    pub fn insert_doctor(&mut self, doctor: Doctor) -> Result<(), BookingError> {
        insert_unique(&mut self.doctors, RecordKind::Doctor, doctor.id(), doctor)
    }

    pub fn insert_receptionist(&mut self, receptionist: Receptionist) -> Result<(), BookingError> {
        insert_unique(
            &mut self.receptionists,
            RecordKind::Receptionist,
            receptionist.id(),
            receptionist,
        )
    }

    pub fn insert_hospital(&mut self, hospital: Hospital) -> Result<(), BookingError> {
        insert_unique(&mut self.hospitals, RecordKind::Hospital, hospital.id, hospital)
    }

    /// Add an appointment to the catalog only. Role lists are left untouched.
    pub fn insert_appointment(&mut self, appointment: Appointment) -> Result<(), BookingError> {
        insert_unique(
            &mut self.appointments,
            RecordKind::Appointment,
            appointment.id(),
            appointment,
        )
    }

    pub fn patient(&self, id: RecordId) -> Result<&Patient, BookingError> {
        self.patients
            .get(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Patient, id))
    }

    pub fn patient_mut(&mut self, id: RecordId) -> Result<&mut Patient, BookingError> {
        self.patients
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Patient, id))
    }

    pub fn doctor(&self, id: RecordId) -> Result<&Doctor, BookingError> {
        self.doctors
            .get(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Doctor, id))
    }

    pub fn doctor_mut(&mut self, id: RecordId) -> Result<&mut Doctor, BookingError> {
        self.doctors
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Doctor, id))
    }

    pub fn receptionist(&self, id: RecordId) -> Result<&Receptionist, BookingError> {
        self.receptionists
            .get(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Receptionist, id))
    }

    pub fn receptionist_mut(&mut self, id: RecordId) -> Result<&mut Receptionist, BookingError> {
        self.receptionists
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Receptionist, id))
    }

    pub fn hospital(&self, id: RecordId) -> Result<&Hospital, BookingError> {
        self.hospitals
            .get(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Hospital, id))
    }

    pub fn appointment(&self, id: RecordId) -> Result<&Appointment, BookingError> {
        self.appointments
            .get(&id)
            .ok_or_else(|| BookingError::not_found(RecordKind::Appointment, id))
    }

    pub fn has_appointment(&self, id: RecordId) -> bool {
        self.appointments.contains_key(&id)
    }

    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.values()
    }

    pub fn receptionists(&self) -> impl Iterator<Item = &Receptionist> {
        self.receptionists.values()
    }

    pub fn hospitals(&self) -> impl Iterator<Item = &Hospital> {
        self.hospitals.values()
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::tests::{sample_doctor, sample_patient, sample_receptionist};
    use crate::roles::Identity;

    #[test]
    fn test_lookup_by_id() {
        let mut dir = Directory::new();
        dir.insert_patient(sample_patient()).unwrap();
        let other = Patient::new(
            Identity::new(2, "Maria", "Lopez", "87654321", "8888877", "923456789", 25),
            "H54321",
        );
        dir.insert_patient(other).unwrap();

        assert_eq!(dir.patient(2).unwrap().identity.name, "Maria");
        assert_eq!(dir.patient(1).unwrap().identity.name, "Juan");
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let mut dir = Directory::new();
        dir.insert_patient(sample_patient()).unwrap();
        dir.insert_doctor(sample_doctor()).unwrap();

        assert_eq!(
            dir.patient(99).unwrap_err(),
            BookingError::not_found(RecordKind::Patient, 99)
        );
        assert!(matches!(
            dir.doctor(42),
            Err(BookingError::RecordNotFound {
                kind: RecordKind::Doctor,
                id: 42
            })
        ));
        assert!(dir.receptionist(1).is_err());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut dir = Directory::new();
        dir.insert_receptionist(sample_receptionist()).unwrap();
        let err = dir.insert_receptionist(sample_receptionist()).unwrap_err();
        assert_eq!(
            err,
            BookingError::DuplicateRecord {
                kind: RecordKind::Receptionist,
                id: 1
            }
        );
        assert_eq!(dir.receptionists().count(), 1);
    }

    #[test]
    fn test_iteration_in_id_order() {
        let mut dir = Directory::new();
        dir.insert_hospital(Hospital::new(3, "C", "c")).unwrap();
        dir.insert_hospital(Hospital::new(1, "A", "a")).unwrap();
        dir.insert_hospital(Hospital::new(2, "B", "b")).unwrap();

        let ids: Vec<_> = dir.hospitals().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(dir.hospital(2).unwrap().name, "B");
    }
}
