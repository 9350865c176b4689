//! CSV row structures and row/domain conversions
//!
//! This module centralizes the flat-file format concerns for every entity
//! kind: one row struct per store file, plus the conversions between rows and
//! domain types. All functions are pure (no I/O) for easy testing.
//!
//! Parsing is strictly positional within a row; the header line exists for
//! humans and is never consulted. Dates are ISO (`%Y-%m-%d`), datetimes are
//! ISO with a `T` separator (`%Y-%m-%dT%H:%M:%S`), and an absent
//! `actualReturnDate` is stored as the empty string.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{Book, LibraryError, Loan, LoanStatus, Patron, PatronRole, Reservation, Review};

/// Datetime format used in reservation rows
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn parse_date(value: &str, column: &str) -> Result<NaiveDate, LibraryError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| LibraryError::parse(format!("Invalid {} '{}': {}", column, value, e)))
}

fn parse_datetime(value: &str, column: &str) -> Result<NaiveDateTime, LibraryError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| LibraryError::parse(format!("Invalid {} '{}': {}", column, value, e)))
}

fn parse_bool(value: &str, column: &str) -> Result<bool, LibraryError> {
    value
        .parse::<bool>()
        .map_err(|_| LibraryError::parse(format!("Invalid {} '{}'", column, value)))
}

/// CSV row for the book store
///
/// Columns: id, isbn, title, author, publisher, publicationYear, genre,
/// availableQuantity, totalQuantity, location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRow {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    #[serde(rename = "publicationYear")]
    pub publication_year: i32,
    pub genre: String,
    #[serde(rename = "availableQuantity")]
    pub available_quantity: u32,
    #[serde(rename = "totalQuantity")]
    pub total_quantity: u32,
    pub location: String,
}

/// Convert a BookRow to a Book, enforcing the counter invariant
pub fn book_from_row(row: BookRow) -> Result<Book, LibraryError> {
    if row.available_quantity > row.total_quantity {
        return Err(LibraryError::parse(format!(
            "Book {}: available {} exceeds total {}",
            row.id, row.available_quantity, row.total_quantity
        )));
    }

    Ok(Book {
        id: row.id,
        isbn: row.isbn,
        title: row.title,
        author: row.author,
        publisher: row.publisher,
        publication_year: row.publication_year,
        genre: row.genre,
        available_count: row.available_quantity,
        total_count: row.total_quantity,
        location: row.location,
    })
}

/// Convert a Book to its CSV row
pub fn book_to_row(book: &Book) -> BookRow {
    BookRow {
        id: book.id.clone(),
        isbn: book.isbn.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        publisher: book.publisher.clone(),
        publication_year: book.publication_year,
        genre: book.genre.clone(),
        available_quantity: book.available_count,
        total_quantity: book.total_count,
        location: book.location.clone(),
    }
}

/// CSV row for the patron store
///
/// Columns: id, firstName, lastName, email, phone, type, field1, field2.
/// The `field1`/`field2` pair carries the role-specific attributes, keyed by
/// the `type` tag: major/semester for students, department/specialization for
/// teachers, title/fullPermission for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatronRow {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub role_type: String,
    pub field1: String,
    pub field2: String,
}

/// Convert a PatronRow to a Patron
///
/// An unknown role tag is a parse error, so a policy lookup on a loaded
/// patron can never fail.
pub fn patron_from_row(row: PatronRow) -> Result<Patron, LibraryError> {
    let role = match row.role_type.as_str() {
        "STUDENT" => PatronRole::Student {
            major: row.field1,
            semester: row.field2,
        },
        "TEACHER" => PatronRole::Teacher {
            department: row.field1,
            specialization: row.field2,
        },
        "ADMINISTRATOR" => PatronRole::Administrator {
            title: row.field1,
            full_permission: parse_bool(&row.field2, "fullPermission")?,
        },
        other => {
            return Err(LibraryError::parse(format!(
                "Unknown patron type '{}' for patron {}",
                other, row.id
            )))
        }
    };

    Ok(Patron {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        role,
        notifications: Vec::new(),
    })
}

/// Convert a Patron to its CSV row
pub fn patron_to_row(patron: &Patron) -> PatronRow {
    let (field1, field2) = match &patron.role {
        PatronRole::Student { major, semester } => (major.clone(), semester.clone()),
        PatronRole::Teacher {
            department,
            specialization,
        } => (department.clone(), specialization.clone()),
        PatronRole::Administrator {
            title,
            full_permission,
        } => (title.clone(), full_permission.to_string()),
    };

    PatronRow {
        id: patron.id.clone(),
        first_name: patron.first_name.clone(),
        last_name: patron.last_name.clone(),
        email: patron.email.clone(),
        phone: patron.phone.clone(),
        role_type: patron.role.tag().to_string(),
        field1,
        field2,
    }
}

/// CSV row for the loan store
///
/// Columns: id, patronId, bookId, loanDate, estimatedReturnDate,
/// actualReturnDate, status, observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: String,
    #[serde(rename = "patronId")]
    pub patron_id: String,
    #[serde(rename = "bookId")]
    pub book_id: String,
    #[serde(rename = "loanDate")]
    pub loan_date: String,
    #[serde(rename = "estimatedReturnDate")]
    pub estimated_return_date: String,
    #[serde(rename = "actualReturnDate")]
    pub actual_return_date: String,
    pub status: String,
    pub observations: String,
}

/// Convert a LoanRow to a Loan
pub fn loan_from_row(row: LoanRow) -> Result<Loan, LibraryError> {
    let actual_return_date = if row.actual_return_date.is_empty() {
        None
    } else {
        Some(parse_date(&row.actual_return_date, "actualReturnDate")?)
    };

    Ok(Loan {
        id: row.id,
        patron_id: row.patron_id,
        book_id: row.book_id,
        loan_date: parse_date(&row.loan_date, "loanDate")?,
        estimated_return_date: parse_date(&row.estimated_return_date, "estimatedReturnDate")?,
        actual_return_date,
        status: LoanStatus::parse(&row.status)?,
        observations: row.observations,
    })
}

/// Convert a Loan to its CSV row
pub fn loan_to_row(loan: &Loan) -> LoanRow {
    LoanRow {
        id: loan.id.clone(),
        patron_id: loan.patron_id.clone(),
        book_id: loan.book_id.clone(),
        loan_date: loan.loan_date.to_string(),
        estimated_return_date: loan.estimated_return_date.to_string(),
        actual_return_date: loan
            .actual_return_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        status: loan.status.as_str().to_string(),
        observations: loan.observations.clone(),
    }
}

/// CSV row for the reservation store
///
/// Columns: id, patronId, bookId, reservationDate, expirationDate, active,
/// completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRow {
    pub id: String,
    #[serde(rename = "patronId")]
    pub patron_id: String,
    #[serde(rename = "bookId")]
    pub book_id: String,
    #[serde(rename = "reservationDate")]
    pub reservation_date: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
    pub active: String,
    pub completed: String,
}

/// Convert a ReservationRow to a Reservation
pub fn reservation_from_row(row: ReservationRow) -> Result<Reservation, LibraryError> {
    Ok(Reservation {
        id: row.id,
        patron_id: row.patron_id,
        book_id: row.book_id,
        reservation_date: parse_datetime(&row.reservation_date, "reservationDate")?,
        expiration_date: parse_datetime(&row.expiration_date, "expirationDate")?,
        active: parse_bool(&row.active, "active")?,
        completed: parse_bool(&row.completed, "completed")?,
    })
}

/// Convert a Reservation to its CSV row
pub fn reservation_to_row(reservation: &Reservation) -> ReservationRow {
    ReservationRow {
        id: reservation.id.clone(),
        patron_id: reservation.patron_id.clone(),
        book_id: reservation.book_id.clone(),
        reservation_date: reservation.reservation_date.format(DATETIME_FORMAT).to_string(),
        expiration_date: reservation.expiration_date.format(DATETIME_FORMAT).to_string(),
        active: reservation.active.to_string(),
        completed: reservation.completed.to_string(),
    }
}

/// CSV row for the review store
///
/// Columns: id, patronId, bookId, rating, comment, creationDate, approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: String,
    #[serde(rename = "patronId")]
    pub patron_id: String,
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub rating: String,
    pub comment: String,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    pub approved: String,
}

/// Convert a ReviewRow to a Review, enforcing the rating range
pub fn review_from_row(row: ReviewRow) -> Result<Review, LibraryError> {
    let rating = row
        .rating
        .parse::<u8>()
        .map_err(|_| LibraryError::parse(format!("Invalid rating '{}'", row.rating)))?;
    if !Review::rating_in_range(rating) {
        return Err(LibraryError::parse(format!(
            "Review {}: rating {} out of range",
            row.id, rating
        )));
    }

    Ok(Review {
        id: row.id,
        patron_id: row.patron_id,
        book_id: row.book_id,
        rating,
        comment: row.comment,
        creation_date: parse_datetime(&row.creation_date, "creationDate")?,
        approved: parse_bool(&row.approved, "approved")?,
    })
}

/// Convert a Review to its CSV row
pub fn review_to_row(review: &Review) -> ReviewRow {
    ReviewRow {
        id: review.id.clone(),
        patron_id: review.patron_id.clone(),
        book_id: review.book_id.clone(),
        rating: review.rating.to_string(),
        comment: review.comment.clone(),
        creation_date: review.creation_date.format(DATETIME_FORMAT).to_string(),
        approved: review.approved.to_string(),
    }
}
