//! Appointment database operations.

use std::collections::HashMap;

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, NewAppointment, Patient};

const APPOINTMENT_SELECT: &str = r#"
    SELECT a.id, a.reason, a.date, a.created_at,
           p.id, p.name, p.ssn, p.created_at
    FROM appointments a
    JOIN patients p ON p.id = a.patient_id
"#;

/// Unicode-aware case folding used for reason search.
fn fold_reason(reason: &str) -> String {
    reason.to_lowercase()
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        reason: row.get(1)?,
        date: row.get(2)?,
        created_at: row.get(3)?,
        patient: Patient {
            id: row.get(4)?,
            name: row.get(5)?,
            ssn: row.get(6)?,
            created_at: row.get(7)?,
        },
    })
}

impl Database {
    /// Insert a batch of appointments atomically.
    ///
    /// Returns the stored appointments in input order. A failure on any row
    /// leaves none of the batch behind.
    pub fn insert_appointments(&self, appointments: &[NewAppointment]) -> DbResult<Vec<Appointment>> {
        self.atomically(|db| -> DbResult<Vec<Appointment>> {
            let mut owners: HashMap<i64, Patient> = HashMap::new();
            let mut stored = Vec::with_capacity(appointments.len());

            let mut stmt = db.conn.prepare_cached(
                "INSERT INTO appointments (reason, reason_folded, date, patient_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for appt in appointments {
                stmt.execute(params![
                    appt.reason,
                    fold_reason(&appt.reason),
                    appt.date,
                    appt.patient_id,
                    appt.created_at
                ])
                    .map_err(DbError::classify)?;
                let id = db.conn.last_insert_rowid();

                let patient = match owners.get(&appt.patient_id) {
                    Some(p) => p.clone(),
                    None => {
                        let p = db.get_patient(appt.patient_id)?.ok_or_else(|| {
                            DbError::NotFound(format!("patient {}", appt.patient_id))
                        })?;
                        owners.insert(appt.patient_id, p.clone());
                        p
                    }
                };

                stored.push(Appointment {
                    id,
                    reason: appt.reason.clone(),
                    date: appt.date.clone(),
                    patient,
                    created_at: appt.created_at.clone(),
                });
            }

            Ok(stored)
        })
    }

    /// Delete a batch of appointments atomically. Returns rows removed.
    pub fn delete_appointments(&self, appointments: &[Appointment]) -> DbResult<usize> {
        self.atomically(|db| -> DbResult<usize> {
            let mut stmt = db
                .conn
                .prepare_cached("DELETE FROM appointments WHERE id = ?")?;
            let mut removed = 0;
            for appt in appointments {
                removed += stmt.execute([appt.id])?;
            }
            Ok(removed)
        })
    }

    /// Find appointments whose reason equals `keyword`, ignoring case.
    pub fn find_appointments_by_reason(&self, keyword: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPOINTMENT_SELECT} WHERE a.reason_folded = ?1 ORDER BY a.id"
        ))?;

        let rows = stmt.query_map([fold_reason(keyword)], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Find appointments for the patient with `ssn`, latest date first.
    ///
    /// Dates are ordered as text; equal dates put the higher ID first.
    pub fn find_appointments_by_patient_ssn(&self, ssn: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPOINTMENT_SELECT} WHERE p.ssn = ?1 ORDER BY a.date DESC, a.id DESC"
        ))?;

        let rows = stmt.query_map([ssn], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all appointments owned by a patient, in creation order.
    pub fn list_appointments_for_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPOINTMENT_SELECT} WHERE a.patient_id = ?1 ORDER BY a.id"
        ))?;

        let rows = stmt.query_map([patient_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
