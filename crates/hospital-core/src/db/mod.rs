//! Database layer for the appointments store.

mod appointments;
mod patients;
mod schema;

#[allow(unused_imports)]
pub use appointments::*;
#[allow(unused_imports)]
pub use patients::*;
pub use schema::*;

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl DbError {
    /// Map constraint failures (unique SSN, missing patient) to `Constraint`.
    pub(crate) fn classify(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                DbError::Constraint(msg.unwrap_or_else(|| e.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` as one atomic unit: commit on `Ok`, roll back on `Err`.
    ///
    /// When a transaction is already open on this connection, `f` joins it
    /// and the outermost caller decides the outcome.
    pub fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        if !self.conn.is_autocommit() {
            return f(self);
        }

        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        // Dropping `tx` without commit rolls back.
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}
