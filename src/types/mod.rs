//! Core data types for the lending engine
//!
//! This module contains the domain entities (books, patrons, loans,
//! reservations, reviews) and the error type shared across the system.

pub mod book;
pub mod error;
pub mod loan;
pub mod patron;
pub mod reservation;
pub mod review;

pub use book::Book;
pub use error::LibraryError;
pub use loan::{Loan, LoanStatus};
pub use patron::{Patron, PatronRole};
pub use reservation::{Reservation, RESERVATION_WINDOW_DAYS};
pub use review::{Review, RATING_MAX, RATING_MIN};
