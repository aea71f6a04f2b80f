//! Appointment models.

use serde::{Deserialize, Serialize};

use super::Patient;

/// A persisted appointment with its owning patient resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Surrogate ID assigned by the store
    pub id: i64,
    /// Free-text reason (e.g., "Checkup")
    pub reason: String,
    /// Date in `YYYY-MM-DD` form, compared as a string
    pub date: String,
    /// Owning patient
    pub patient: Patient,
    /// Creation timestamp
    pub created_at: String,
}

/// An appointment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub reason: String,
    pub date: String,
    pub patient_id: i64,
    pub created_at: String,
}

impl NewAppointment {
    /// Create a new appointment owned by `patient`.
    pub fn new(reason: String, date: String, patient: &Patient) -> Self {
        Self {
            reason,
            date,
            patient_id: patient.id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Payload for bulk appointment creation.
///
/// `None` stands for a list that was not supplied at all; it is rejected the
/// same way as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkAppointmentsRequest {
    pub reasons: Option<Vec<String>>,
    pub dates: Option<Vec<String>>,
}

impl BulkAppointmentsRequest {
    /// Build a request with both lists present.
    pub fn new(reasons: Vec<String>, dates: Vec<String>) -> Self {
        Self {
            reasons: Some(reasons),
            dates: Some(dates),
        }
    }
}

/// Flattened appointment projection handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: i64,
    pub reason: String,
    pub date: String,
    pub patient_name: String,
    #[serde(rename = "patientSSN")]
    pub patient_ssn: String,
}

impl From<&Appointment> for AppointmentView {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            reason: appointment.reason.clone(),
            date: appointment.date.clone(),
            patient_name: appointment.patient.name.clone(),
            patient_ssn: appointment.patient.ssn.clone(),
        }
    }
}

impl AppointmentView {
    /// Project a list of appointments, keeping order.
    pub fn from_appointments(appointments: &[Appointment]) -> Vec<Self> {
        appointments.iter().map(Self::from).collect()
    }
}
