//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{NewPatient, Patient};

const PATIENT_SELECT: &str = "SELECT id, name, ssn, created_at FROM patients";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        ssn: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Database {
    /// Insert a new patient and return it with its assigned ID.
    ///
    /// A second patient with the same SSN fails with [`DbError::Constraint`].
    pub fn insert_patient(&self, patient: NewPatient) -> DbResult<Patient> {
        self.conn
            .execute(
                "INSERT INTO patients (name, ssn, created_at) VALUES (?1, ?2, ?3)",
                params![patient.name, patient.ssn, patient.created_at],
            )
            .map_err(DbError::classify)?;
        let id = self.conn.last_insert_rowid();
        Ok(patient.into_patient(id))
    }

    /// Get a patient by surrogate ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("{PATIENT_SELECT} WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a patient by SSN (exact match).
    pub fn get_patient_by_ssn(&self, ssn: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("{PATIENT_SELECT} WHERE ssn = ?"),
                [ssn],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let patient = db
            .insert_patient(NewPatient::new("John Doe".into(), "123-45-6789".into()))
            .unwrap();
        assert!(patient.id > 0);

        let retrieved = db.get_patient(patient.id).unwrap().unwrap();
        assert_eq!(retrieved, patient);
    }

    #[test]
    fn test_get_by_ssn() {
        let db = setup_db();

        let patient = db
            .insert_patient(NewPatient::new("John Doe".into(), "123-45-6789".into()))
            .unwrap();
        db.insert_patient(NewPatient::new("Jane Roe".into(), "555-55-5555".into()))
            .unwrap();

        let found = db.get_patient_by_ssn("123-45-6789").unwrap().unwrap();
        assert_eq!(found.id, patient.id);
        assert_eq!(found.name, "John Doe");
    }

    #[test]
    fn test_get_by_ssn_is_exact() {
        let db = setup_db();
        db.insert_patient(NewPatient::new("John Doe".into(), "123-45-6789".into()))
            .unwrap();

        assert!(db.get_patient_by_ssn("123-45").unwrap().is_none());
        assert!(db.get_patient_by_ssn(" 123-45-6789").unwrap().is_none());
        assert!(db.get_patient_by_ssn("unknown").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ssn_is_constraint_error() {
        let db = setup_db();
        db.insert_patient(NewPatient::new("John Doe".into(), "123".into()))
            .unwrap();

        let err = db
            .insert_patient(NewPatient::new("Other".into(), "123".into()))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_ids_are_distinct() {
        let db = setup_db();
        let a = db
            .insert_patient(NewPatient::new("A".into(), "1".into()))
            .unwrap();
        let b = db
            .insert_patient(NewPatient::new("B".into(), "2".into()))
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
