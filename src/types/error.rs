//! Error types for the lending engine
//!
//! This module defines all error types that can occur while managing books,
//! patrons, loans, reservations, and reviews.
//!
//! # Error Categories
//!
//! - **Not-found errors**: a referenced patron/book/loan/reservation/review id does not exist
//! - **Validation errors**: malformed input (missing field, bad email or ISBN shape, rating out of range)
//! - **Conflict errors**: duplicate unique key (email, ISBN)
//! - **Business-rule errors**: book unavailable, loan limit reached, terminal-state records, duplicate review
//! - **Infrastructure errors**: file I/O and CSV parsing failures

use thiserror::Error;

/// Main error type for the lending engine
///
/// Each variant carries enough context to diagnose the failure at the call
/// site. All errors are synchronous and surfaced to the immediate caller;
/// none are retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    /// Referenced patron does not exist
    #[error("Patron not found: {id}")]
    PatronNotFound {
        /// The patron id that was looked up
        id: String,
    },

    /// Referenced book does not exist
    #[error("Book not found: {id}")]
    BookNotFound {
        /// The book id that was looked up
        id: String,
    },

    /// Referenced loan does not exist
    #[error("Loan not found: {id}")]
    LoanNotFound {
        /// The loan id that was looked up
        id: String,
    },

    /// Referenced reservation does not exist
    #[error("Reservation not found: {id}")]
    ReservationNotFound {
        /// The reservation id that was looked up
        id: String,
    },

    /// Referenced review does not exist
    #[error("Review not found: {id}")]
    ReviewNotFound {
        /// The review id that was looked up
        id: String,
    },

    /// Malformed input: missing required field or value out of range
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the invalid input
        message: String,
    },

    /// Review rating outside the 1-5 range
    #[error("Rating {rating} is out of range (must be between 1 and 5)")]
    RatingOutOfRange {
        /// The rejected rating value
        rating: u8,
    },

    /// A patron with this email is already registered
    #[error("Email already registered: {email}")]
    DuplicateEmail {
        /// The conflicting email address
        email: String,
    },

    /// A book with this ISBN is already catalogued
    #[error("ISBN already catalogued: {isbn}")]
    DuplicateIsbn {
        /// The conflicting ISBN
        isbn: String,
    },

    /// No copy of the book is currently available
    ///
    /// Raised by loan and reservation creation; the saturating no-ops on the
    /// book counters themselves are not errors.
    #[error("Book '{title}' is not available")]
    BookNotAvailable {
        /// Title of the unavailable book
        title: String,
    },

    /// The patron already holds as many active/overdue loans as their role allows
    #[error("Patron {patron} has reached the loan limit of {limit}")]
    LoanLimitReached {
        /// The patron id
        patron: String,
        /// The role's loan limit
        limit: u32,
    },

    /// The loan is already completed; returning it again is rejected
    #[error("Loan {id} is already returned")]
    LoanAlreadyReturned {
        /// The loan id
        id: String,
    },

    /// The reservation is no longer active; cancel/complete are rejected
    #[error("Reservation {id} is no longer active")]
    ReservationNotActive {
        /// The reservation id
        id: String,
    },

    /// The patron has already reviewed this book
    #[error("Patron {patron} has already reviewed book {book}")]
    DuplicateReview {
        /// The patron id
        patron: String,
        /// The book id
        book: String,
    },

    /// I/O error while reading or writing a store file
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV row could not be parsed into a record
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LibraryError {
    fn from(error: std::io::Error) -> Self {
        LibraryError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LibraryError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LibraryError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

// Helper constructors for the common cases

impl LibraryError {
    /// Create a PatronNotFound error
    pub fn patron_not_found(id: &str) -> Self {
        LibraryError::PatronNotFound { id: id.to_string() }
    }

    /// Create a BookNotFound error
    pub fn book_not_found(id: &str) -> Self {
        LibraryError::BookNotFound { id: id.to_string() }
    }

    /// Create a LoanNotFound error
    pub fn loan_not_found(id: &str) -> Self {
        LibraryError::LoanNotFound { id: id.to_string() }
    }

    /// Create a ReservationNotFound error
    pub fn reservation_not_found(id: &str) -> Self {
        LibraryError::ReservationNotFound { id: id.to_string() }
    }

    /// Create a ReviewNotFound error
    pub fn review_not_found(id: &str) -> Self {
        LibraryError::ReviewNotFound { id: id.to_string() }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        LibraryError::Validation {
            message: message.into(),
        }
    }

    /// Create a BookNotAvailable error
    pub fn book_not_available(title: &str) -> Self {
        LibraryError::BookNotAvailable {
            title: title.to_string(),
        }
    }

    /// Create a LoanLimitReached error
    pub fn loan_limit_reached(patron: &str, limit: u32) -> Self {
        LibraryError::LoanLimitReached {
            patron: patron.to_string(),
            limit,
        }
    }

    /// Create a DuplicateReview error
    pub fn duplicate_review(patron: &str, book: &str) -> Self {
        LibraryError::DuplicateReview {
            patron: patron.to_string(),
            book: book.to_string(),
        }
    }

    /// Create a Parse error without a line number
    pub fn parse(message: impl Into<String>) -> Self {
        LibraryError::Parse {
            line: None,
            message: message.into(),
        }
    }
}
