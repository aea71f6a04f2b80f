//! Command-line front end for the appointment service.
//!
//! # Environment Variables
//! - `HOSPITAL_DB`: SQLite database path (default: "hospital.db")
//! - `RUST_LOG`: log filter (default: "hospital=info")

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hospital_core::{AppointmentView, BulkAppointmentsRequest, Database, HospitalService, UsageCounter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hospital")]
#[command(about = "Patient and appointment management")]
struct Cli {
    /// SQLite database path
    #[arg(long, env = "HOSPITAL_DB", default_value = "hospital.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create appointments for a patient, registering the patient if new
    BulkCreate {
        /// Patient name (used only for new patients)
        #[arg(long)]
        name: String,
        /// Patient SSN
        #[arg(long)]
        ssn: String,
        /// Appointment reason (repeat for each appointment)
        #[arg(long = "reason")]
        reasons: Vec<String>,
        /// Appointment date YYYY-MM-DD (repeat, same order as reasons)
        #[arg(long = "date")]
        dates: Vec<String>,
    },
    /// Find appointments by reason (case-insensitive)
    ByReason {
        keyword: String,
    },
    /// Delete all appointments of a patient
    Delete {
        #[arg(long)]
        ssn: String,
    },
    /// Show the most recent appointment of a patient
    Latest {
        #[arg(long)]
        ssn: String,
    },
    /// Look up a patient by SSN
    Patient {
        #[arg(long)]
        ssn: String,
    },
}

const DEFAULT_LOG_FILTER: &str = "hospital=info,hospital_core=info";

/// `RUST_LOG` wins over the default filter when set and valid.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let db = Database::open(&cli.database)?;
    let usage = UsageCounter::new();
    let service = HospitalService::new(&db, &usage);

    tracing::debug!(database = %cli.database.display(), "database opened");

    match cli.command {
        Commands::BulkCreate {
            name,
            ssn,
            reasons,
            dates,
        } => {
            let request = BulkAppointmentsRequest::new(reasons, dates);
            let created = service.bulk_create_appointments(&name, &ssn, &request)?;
            print_json(&AppointmentView::from_appointments(&created))?;
        }
        Commands::ByReason { keyword } => {
            if keyword.trim().is_empty() {
                anyhow::bail!("Search keyword cannot be empty");
            }
            let found = service.get_appointments_by_reason(&keyword)?;
            print_json(&AppointmentView::from_appointments(&found))?;
        }
        Commands::Delete { ssn } => {
            let removed = service.delete_appointments_by_ssn(&ssn)?;
            println!("Deleted {} appointment(s).", removed);
        }
        Commands::Latest { ssn } => match service.find_latest_appointment_by_ssn(&ssn)? {
            Some(latest) => print_json(&AppointmentView::from(&latest))?,
            None => {
                println!("No appointments found for SSN: {}", ssn);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Patient { ssn } => match service.find_patient_by_ssn(&ssn)? {
            Some(patient) => print_json(&patient)?,
            None => {
                println!("No patient found for SSN: {}", ssn);
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_overrides_default_levels() {
        std::env::set_var("RUST_LOG", "hospital_core=debug");
        let filter = log_filter().to_string();
        std::env::remove_var("RUST_LOG");

        assert!(filter.contains("hospital_core=debug"));
        assert!(!filter.contains("hospital_core=info"));
    }

    #[test]
    fn test_default_filter_parses() {
        let filter = EnvFilter::new(DEFAULT_LOG_FILTER).to_string();
        assert!(filter.contains("hospital=info"));
        assert!(filter.contains("hospital_core=info"));
    }
}
