//! Hospital Core Library
//!
//! Patient resolution and appointment management over a local SQLite store.
//!
//! # Architecture
//!
//! ```text
//! Caller (CLI / FFI host)
//!         │
//!         ▼
//!   HospitalService ──────────────► UsageRecorder
//!   (validation, find-or-create,      (process-wide counter)
//!    latest-appointment rule)
//!         │
//!         ▼
//!   PatientStore + AppointmentStore + UnitOfWork
//!         │
//!         ▼
//!   Database (SQLite: patients, appointments)
//! ```
//!
//! # Core Principle
//!
//! **Absence is not failure.** Lookups that find nothing return `None`;
//! errors are reserved for invalid input and storage failures.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, Appointment, AppointmentView, etc.)
//! - [`store`]: Storage contracts consumed by the service
//! - [`usage`]: Usage counting for operational telemetry
//! - [`service`]: Appointment domain service

pub mod db;
pub mod models;
pub mod service;
pub mod store;
pub mod usage;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use models::{
    Appointment, AppointmentView, BulkAppointmentsRequest, NewAppointment, NewPatient, Patient,
};
pub use service::{latest_appointment, HospitalService, ServiceError, ServiceResult};
pub use store::{AppointmentStore, PatientStore, UnitOfWork};
pub use usage::{NoopUsageRecorder, UsageCounter, UsageRecorder};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HospitalError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<db::DbError> for HospitalError {
    fn from(e: db::DbError) -> Self {
        HospitalError::DatabaseError(e.to_string())
    }
}

impl From<ServiceError> for HospitalError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidArgument(msg) => HospitalError::InvalidArgument(msg),
            ServiceError::Storage(db) => db.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for HospitalError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HospitalError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<HospitalCore>, HospitalError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(HospitalCore::new(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<HospitalCore>, HospitalError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(HospitalCore::new(db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HospitalCore {
    db: Arc<Mutex<Database>>,
    usage: Arc<UsageCounter>,
}

impl HospitalCore {
    fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            usage: Arc::new(UsageCounter::new()),
        }
    }
}

#[uniffi::export]
impl HospitalCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Find a patient by SSN.
    pub fn find_patient_by_ssn(&self, ssn: String) -> Result<Option<FfiPatient>, HospitalError> {
        let db = self.db.lock()?;
        let service = HospitalService::new(&*db, self.usage.as_ref());
        let patient = service.find_patient_by_ssn(&ssn)?;
        Ok(patient.map(|p| p.into()))
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Create appointments, creating the patient on first contact.
    pub fn bulk_create_appointments(
        &self,
        patient_name: String,
        ssn: String,
        reasons: Vec<String>,
        dates: Vec<String>,
    ) -> Result<Vec<FfiAppointment>, HospitalError> {
        let db = self.db.lock()?;
        let service = HospitalService::new(&*db, self.usage.as_ref());
        let request = BulkAppointmentsRequest::new(reasons, dates);
        let created = service.bulk_create_appointments(&patient_name, &ssn, &request)?;
        Ok(created.iter().map(|a| a.into()).collect())
    }

    /// Search appointments by reason, ignoring case.
    pub fn appointments_by_reason(
        &self,
        keyword: String,
    ) -> Result<Vec<FfiAppointment>, HospitalError> {
        let db = self.db.lock()?;
        let service = HospitalService::new(&*db, self.usage.as_ref());
        let found = service.get_appointments_by_reason(&keyword)?;
        Ok(found.iter().map(|a| a.into()).collect())
    }

    /// Delete all appointments of a patient. Returns the number removed.
    pub fn delete_appointments_by_ssn(&self, ssn: String) -> Result<u64, HospitalError> {
        let db = self.db.lock()?;
        let service = HospitalService::new(&*db, self.usage.as_ref());
        let removed = service.delete_appointments_by_ssn(&ssn)?;
        u64::try_from(removed)
            .map_err(|_| HospitalError::DatabaseError(format!("Deleted count out of range: {}", removed)))
    }

    /// Most recent appointment of a patient.
    pub fn latest_appointment_by_ssn(
        &self,
        ssn: String,
    ) -> Result<Option<FfiAppointment>, HospitalError> {
        let db = self.db.lock()?;
        let service = HospitalService::new(&*db, self.usage.as_ref());
        let latest = service.find_latest_appointment_by_ssn(&ssn)?;
        Ok(latest.as_ref().map(|a| a.into()))
    }

    /// Number of recorded service invocations.
    pub fn usage_count(&self) -> u64 {
        self.usage.count()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub ssn: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            ssn: patient.ssn,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: i64,
    pub reason: String,
    pub date: String,
    pub patient_name: String,
    pub patient_ssn: String,
}

impl From<&Appointment> for FfiAppointment {
    fn from(appointment: &Appointment) -> Self {
        let view = AppointmentView::from(appointment);
        Self {
            id: view.id,
            reason: view.reason,
            date: view.date,
            patient_name: view.patient_name,
            patient_ssn: view.patient_ssn,
        }
    }
}
