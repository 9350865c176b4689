//! Lending Engine CLI
//!
//! Command-line interface for the library record-keeping service.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- check-overdue
//! cargo run -- --data-dir data/csv loans --patron <ID>
//! cargo run -- books
//! cargo run -- reservations --active
//! cargo run -- reviews --approved
//! ```
//!
//! Records are loaded from the CSV files in the data directory, the
//! requested operation runs against the in-memory stores, and every
//! mutation is written back before the process exits.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (data directory not readable, write failure, etc.)

use lending_engine::cli::{self, Command};
use lending_engine::core::{
    Clock, LoanEngine, NotificationSink, PatronInbox, RecordStore, ReservationEngine,
    ReviewEngine, SystemClock,
};
use lending_engine::types::LibraryError;
use std::process;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lending_engine=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: cli::CliArgs) -> Result<(), LibraryError> {
    let books = Arc::new(RecordStore::open(&args.data_dir)?);
    let patrons = Arc::new(RecordStore::open(&args.data_dir)?);
    let loans = Arc::new(RecordStore::open(&args.data_dir)?);
    let reservations = Arc::new(RecordStore::open(&args.data_dir)?);
    let reviews = Arc::new(RecordStore::open(&args.data_dir)?);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sink: Arc<dyn NotificationSink> = Arc::new(PatronInbox::new(Arc::clone(&patrons)));

    let loan_engine = LoanEngine::new(
        Arc::clone(&loans),
        Arc::clone(&books),
        Arc::clone(&patrons),
        sink,
        Arc::clone(&clock),
    );
    let reservation_engine = ReservationEngine::new(
        Arc::clone(&reservations),
        Arc::clone(&books),
        Arc::clone(&patrons),
        Arc::clone(&clock),
    );
    let review_engine = ReviewEngine::new(
        Arc::clone(&reviews),
        Arc::clone(&books),
        Arc::clone(&patrons),
        clock,
    );

    match args.command {
        Command::CheckOverdue => {
            let transitioned = loan_engine.check_overdue()?;
            println!("{} loan(s) marked overdue", transitioned.len());
            for loan in transitioned {
                println!(
                    "{}  patron={}  book={}  due={}",
                    loan.id, loan.patron_id, loan.book_id, loan.estimated_return_date
                );
            }
        }
        Command::Loans { patron } => {
            let listed = match patron {
                Some(id) => loan_engine.loans_for_patron(&id),
                None => loan_engine.get_all(),
            };
            for loan in listed {
                let returned = loan
                    .actual_return_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  patron={}  book={}  {}  due={}  returned={}",
                    loan.id,
                    loan.patron_id,
                    loan.book_id,
                    loan.status.as_str(),
                    loan.estimated_return_date,
                    returned
                );
            }
        }
        Command::Books => {
            for book in books.get_all() {
                println!(
                    "{}  {}  \"{}\" by {}  {}/{} available",
                    book.id,
                    book.isbn,
                    book.title,
                    book.author,
                    book.available_count,
                    book.total_count
                );
            }
        }
        Command::Patrons => {
            for patron in patrons.get_all() {
                println!(
                    "{}  {}  <{}>  {}",
                    patron.id,
                    patron.full_name(),
                    patron.email,
                    patron.role.tag()
                );
            }
        }
        Command::Reservations { active_only } => {
            let listed = if active_only {
                reservation_engine.active_reservations()
            } else {
                reservation_engine.get_all()
            };
            for reservation in listed {
                let state = if reservation.completed {
                    "completed"
                } else if reservation.active {
                    "active"
                } else {
                    "cancelled"
                };
                println!(
                    "{}  patron={}  book={}  {}  expires={}",
                    reservation.id,
                    reservation.patron_id,
                    reservation.book_id,
                    state,
                    reservation.expiration_date
                );
            }
        }
        Command::Reviews { approved_only } => {
            let listed = if approved_only {
                review_engine.approved_reviews()
            } else {
                review_engine.get_all()
            };
            for review in listed {
                let state = if review.approved {
                    "approved"
                } else {
                    "pending"
                };
                println!(
                    "{}  patron={}  book={}  rating={}  {}",
                    review.id, review.patron_id, review.book_id, review.rating, state
                );
            }
        }
    }

    Ok(())
}
