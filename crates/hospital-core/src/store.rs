//! Storage contracts consumed by the appointment service.
//!
//! [`Database`] is the production implementation; tests substitute their
//! own to observe or break individual calls.

use crate::db::{Database, DbError, DbResult};
use crate::models::{Appointment, NewAppointment, NewPatient, Patient};

/// Keyed patient lookup and persistence.
pub trait PatientStore {
    /// Exact-match lookup by SSN.
    fn find_patient_by_ssn(&self, ssn: &str) -> DbResult<Option<Patient>>;

    /// Lookup by surrogate ID.
    fn find_patient(&self, id: i64) -> DbResult<Option<Patient>>;

    /// Persist a new patient, assigning its ID.
    fn save_patient(&self, patient: NewPatient) -> DbResult<Patient>;
}

/// Batch appointment persistence and queries.
pub trait AppointmentStore {
    /// Persist every appointment or none of them.
    fn save_appointments(&self, appointments: &[NewAppointment]) -> DbResult<Vec<Appointment>>;

    /// Delete every appointment or none of them.
    fn delete_appointments(&self, appointments: &[Appointment]) -> DbResult<usize>;

    /// Case-insensitive match on reason.
    fn find_appointments_by_reason(&self, keyword: &str) -> DbResult<Vec<Appointment>>;

    /// Appointments of the patient with `ssn`, latest date first.
    fn find_appointments_by_patient_ssn(&self, ssn: &str) -> DbResult<Vec<Appointment>>;

    /// Appointments owned by a patient.
    fn find_appointments_by_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>>;
}

/// Groups several store calls into one atomic unit.
pub trait UnitOfWork {
    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>;
}

impl PatientStore for Database {
    fn find_patient_by_ssn(&self, ssn: &str) -> DbResult<Option<Patient>> {
        self.get_patient_by_ssn(ssn)
    }

    fn find_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.get_patient(id)
    }

    fn save_patient(&self, patient: NewPatient) -> DbResult<Patient> {
        self.insert_patient(patient)
    }
}

impl AppointmentStore for Database {
    fn save_appointments(&self, appointments: &[NewAppointment]) -> DbResult<Vec<Appointment>> {
        self.insert_appointments(appointments)
    }

    fn delete_appointments(&self, appointments: &[Appointment]) -> DbResult<usize> {
        Database::delete_appointments(self, appointments)
    }

    fn find_appointments_by_reason(&self, keyword: &str) -> DbResult<Vec<Appointment>> {
        Database::find_appointments_by_reason(self, keyword)
    }

    fn find_appointments_by_patient_ssn(&self, ssn: &str) -> DbResult<Vec<Appointment>> {
        Database::find_appointments_by_patient_ssn(self, ssn)
    }

    fn find_appointments_by_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        self.list_appointments_for_patient(patient_id)
    }
}

impl UnitOfWork for Database {
    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        Database::atomically(self, f)
    }
}
