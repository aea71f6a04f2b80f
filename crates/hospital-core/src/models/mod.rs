//! Domain models for the hospital appointments system.

mod appointment;
mod patient;

pub use appointment::*;
pub use patient::*;
