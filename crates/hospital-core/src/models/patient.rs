//! Patient models.

use serde::{Deserialize, Serialize};

/// A persisted patient, identified by its unique SSN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Surrogate ID assigned by the store
    pub id: i64,
    /// Display name (not validated)
    pub name: String,
    /// Social security number - unique natural key
    pub ssn: String,
    /// Creation timestamp
    pub created_at: String,
}

/// A patient that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub ssn: String,
    pub created_at: String,
}

impl NewPatient {
    /// Create a new patient with required fields.
    pub fn new(name: String, ssn: String) -> Self {
        Self {
            name,
            ssn,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach the ID assigned by the store.
    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            ssn: self.ssn,
            created_at: self.created_at,
        }
    }
}

/// Check that an SSN carries at least one non-whitespace character.
pub fn is_blank_ssn(ssn: &str) -> bool {
    ssn.trim().is_empty()
}
