use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage library loans and reservations over CSV record files
#[derive(Parser, Debug)]
#[command(name = "lending-engine")]
#[command(about = "Manage library loans and reservations over CSV record files", long_about = None)]
pub struct CliArgs {
    /// Directory holding the CSV record files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "data/csv",
        help = "Directory holding books.csv, patrons.csv, loans.csv, and reservations.csv"
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available operations
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sweep active loans and mark the ones past their due date as overdue
    CheckOverdue,
    /// List all loans
    Loans {
        /// Only loans held by this patron
        #[arg(long = "patron", value_name = "ID")]
        patron: Option<String>,
    },
    /// List all books in the catalog
    Books,
    /// List all registered patrons
    Patrons,
    /// List reservations
    Reservations {
        /// Only reservations that are still active
        #[arg(long = "active")]
        active_only: bool,
    },
    /// List reviews
    Reviews {
        /// Only reviews that have been approved
        #[arg(long = "approved")]
        approved_only: bool,
    },
}
