//! Lending Engine Library
//! # Overview
//!
//! This library provides a CSV-backed record-keeping service for a library:
//! book catalog, patron registry, loan lifecycle, reservations, and book
//! reviews.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Book, Patron, Loan, Reservation, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::loan_engine`] - Loan creation, returns, and the overdue sweep
//!   - [`core::reservation_engine`] - Reservation placement and resolution
//!   - [`core::review_engine`] - Review submission, approval, and ratings
//!   - [`core::catalog`] - Book catalog and patron registry validation
//!   - [`core::record_store`] - Concurrent CSV-backed record storage
//! - [`io`] - CSV row formats and conversions
//!
//! # Loan Lifecycle
//!
//! A loan moves through three states:
//!
//! - **Active**: The book is out and the due date has not passed
//! - **Overdue**: The overdue sweep found an Active loan past its due date
//! - **Completed**: The book was returned; this state is terminal
//!
//! # Borrowing Policy
//!
//! Each patron role carries its own lending terms:
//!
//! - Students may hold 3 loans at a time, for 15 days each
//! - Teachers may hold 10 loans, for 30 days each
//! - Administrators have no loan cap and borrow for 60 days
//!
//! Active and Overdue loans both count against the cap; Completed loans
//! do not.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{
    BookCatalog, Clock, FixedClock, LoanEngine, NotificationSink, PatronInbox, PatronRegistry,
    RecordStore, ReservationEngine, ReviewEngine, StoredRecord, SystemClock,
};
pub use types::{
    Book, LibraryError, Loan, LoanStatus, Patron, PatronRole, Reservation, Review,
    RESERVATION_WINDOW_DAYS,
};
