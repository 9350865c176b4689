//! Flat-file format handling
//!
//! The row structures and conversions here are pure; the actual file
//! reading and rewriting lives in [`crate::core::RecordStore`].

pub mod rows;

pub use rows::{
    book_from_row, book_to_row, loan_from_row, loan_to_row, patron_from_row, patron_to_row,
    reservation_from_row, reservation_to_row, review_from_row, review_to_row, BookRow, LoanRow,
    PatronRow, ReservationRow, ReviewRow,
};
