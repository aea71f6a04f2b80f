//! Appointment domain service.
//!
//! Owns the business rules: SSN presence checks, find-or-create patient
//! resolution, bulk request validation, and latest-appointment selection.
//! Persistence goes through the [`store`](crate::store) contracts and every
//! completed operation is reported to a [`UsageRecorder`].

use thiserror::Error;
use tracing::{error, info, warn};

use crate::db::DbError;
use crate::models::{is_blank_ssn, Appointment, BulkAppointmentsRequest, NewAppointment, NewPatient, Patient};
use crate::store::{AppointmentStore, PatientStore, UnitOfWork};
use crate::usage::{
    UsageRecorder, BULK_CREATE_APPOINTMENTS, DELETE_APPOINTMENTS_BY_SSN,
    FIND_LATEST_APPOINTMENT_BY_SSN, GET_APPOINTMENTS_BY_REASON,
};

pub const BLANK_SSN: &str = "SSN cannot be null or empty";
pub const NO_REASONS_OR_DATES: &str = "No reasons or dates provided for appointments.";
pub const MISMATCHED_LENGTHS: &str = "Reasons and dates must have the same number of entries.";

/// Service errors. Absence is never an error; it is reported as `None`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Appointment use cases over a patient/appointment store.
pub struct HospitalService<'a, S> {
    store: &'a S,
    usage: &'a dyn UsageRecorder,
}

impl<'a, S> HospitalService<'a, S>
where
    S: PatientStore + AppointmentStore + UnitOfWork,
{
    /// Create a new service.
    pub fn new(store: &'a S, usage: &'a dyn UsageRecorder) -> Self {
        Self { store, usage }
    }

    /// Find a patient by SSN. Blank SSNs are rejected.
    pub fn find_patient_by_ssn(&self, ssn: &str) -> ServiceResult<Option<Patient>> {
        find_patient(self.store, ssn)
    }

    /// Create appointments for a patient, creating the patient on first contact.
    ///
    /// `patient_name` is only used when no patient with `ssn` exists yet.
    /// Patient creation and the appointment batch commit together: any
    /// validation or storage failure leaves nothing behind.
    pub fn bulk_create_appointments(
        &self,
        patient_name: &str,
        ssn: &str,
        request: &BulkAppointmentsRequest,
    ) -> ServiceResult<Vec<Appointment>> {
        let created = self.store.atomically(|store| -> ServiceResult<Vec<Appointment>> {
            let patient = find_or_create_patient(store, patient_name, ssn)?;
            let (reasons, dates) = validate_bulk_request(request)?;

            let batch: Vec<NewAppointment> = reasons
                .iter()
                .zip(dates)
                .map(|(reason, date)| NewAppointment::new(reason.clone(), date.clone(), &patient))
                .collect();

            Ok(store.save_appointments(&batch)?)
        })?;

        for appt in &created {
            info!(
                reason = %appt.reason,
                date = %appt.date,
                ssn = %appt.patient.ssn,
                "created appointment"
            );
        }

        self.usage.record(BULK_CREATE_APPOINTMENTS);
        Ok(created)
    }

    /// Appointments whose reason matches `keyword`, ignoring case.
    pub fn get_appointments_by_reason(&self, keyword: &str) -> ServiceResult<Vec<Appointment>> {
        let matched = self.store.find_appointments_by_reason(keyword)?;
        self.usage.record(GET_APPOINTMENTS_BY_REASON);
        Ok(matched)
    }

    /// Delete every appointment of the patient with `ssn`.
    ///
    /// An unknown patient or a patient without appointments is a no-op.
    /// The patient record itself is kept. Returns the number deleted.
    pub fn delete_appointments_by_ssn(&self, ssn: &str) -> ServiceResult<usize> {
        let removed = self.store.atomically(|store| -> ServiceResult<usize> {
            let Some(patient) = find_patient(store, ssn)? else {
                warn!(ssn, "no patient found");
                return Ok(0);
            };

            let appointments = store.find_appointments_by_patient(patient.id)?;
            if appointments.is_empty() {
                info!(ssn, "no appointments found for patient");
                return Ok(0);
            }

            Ok(store.delete_appointments(&appointments)?)
        })?;

        if removed > 0 {
            info!(ssn, removed, "deleted appointments");
            self.usage.record(DELETE_APPOINTMENTS_BY_SSN);
        }
        Ok(removed)
    }

    /// Most recent appointment of the patient with `ssn`, if any.
    pub fn find_latest_appointment_by_ssn(&self, ssn: &str) -> ServiceResult<Option<Appointment>> {
        require_ssn(ssn)?;

        let appointments = self.store.find_appointments_by_patient_ssn(ssn)?;
        let latest = latest_appointment(appointments);

        match &latest {
            Some(appt) => info!(ssn, date = %appt.date, "found latest appointment"),
            None => info!(ssn, "no appointments found"),
        }

        self.usage.record(FIND_LATEST_APPOINTMENT_BY_SSN);
        Ok(latest)
    }
}

/// Pick the appointment with the greatest date.
///
/// Dates compare as plain strings, which is chronological for `YYYY-MM-DD`.
/// Among equal dates the highest ID wins.
pub fn latest_appointment<I>(appointments: I) -> Option<Appointment>
where
    I: IntoIterator<Item = Appointment>,
{
    appointments
        .into_iter()
        .max_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
}

fn require_ssn(ssn: &str) -> ServiceResult<()> {
    if is_blank_ssn(ssn) {
        return Err(ServiceError::InvalidArgument(BLANK_SSN.into()));
    }
    Ok(())
}

fn find_patient<S: PatientStore>(store: &S, ssn: &str) -> ServiceResult<Option<Patient>> {
    require_ssn(ssn)?;
    Ok(store.find_patient_by_ssn(ssn)?)
}

fn find_or_create_patient<S: PatientStore>(
    store: &S,
    patient_name: &str,
    ssn: &str,
) -> ServiceResult<Patient> {
    if let Some(existing) = find_patient(store, ssn)? {
        info!(ssn = %existing.ssn, "existing patient found");
        return Ok(existing);
    }

    info!(ssn, "creating new patient");
    match store.save_patient(NewPatient::new(patient_name.to_string(), ssn.to_string())) {
        Ok(patient) => Ok(patient),
        // Another writer created the same SSN between our read and write.
        Err(DbError::Constraint(msg)) => {
            warn!(ssn, "patient created concurrently, reusing it");
            store
                .find_patient_by_ssn(ssn)?
                .ok_or(ServiceError::Storage(DbError::Constraint(msg)))
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_bulk_request(request: &BulkAppointmentsRequest) -> ServiceResult<(&[String], &[String])> {
    let (reasons, dates) = match (request.reasons.as_deref(), request.dates.as_deref()) {
        (Some(reasons), Some(dates)) if !reasons.is_empty() && !dates.is_empty() => (reasons, dates),
        _ => {
            error!("no reasons or dates provided for appointments");
            return Err(ServiceError::InvalidArgument(NO_REASONS_OR_DATES.into()));
        }
    };

    if reasons.len() != dates.len() {
        error!(
            reasons = reasons.len(),
            dates = dates.len(),
            "reasons and dates lists differ in size"
        );
        return Err(ServiceError::InvalidArgument(MISMATCHED_LENGTHS.into()));
    }

    Ok((reasons, dates))
}
