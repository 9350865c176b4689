//! Book reviews
//!
//! A review is a patron's rating and comment on a book. Reviews start
//! unapproved and only count toward a book's average rating once a librarian
//! approves them. Each patron may review a given book at most once; the
//! review engine enforces that rule.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const RATING_MIN: u8 = 1;

/// Highest accepted rating
pub const RATING_MAX: u8 = 5;

/// A patron's review of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique review identifier
    pub id: String,

    /// Reviewing patron
    pub patron_id: String,

    /// Reviewed book
    pub book_id: String,

    /// Rating between [`RATING_MIN`] and [`RATING_MAX`] inclusive
    pub rating: u8,

    /// Free-text comment (required, never empty)
    pub comment: String,

    /// When the review was submitted
    pub creation_date: NaiveDateTime,

    /// Whether a librarian has approved the review for display
    pub approved: bool,
}

impl Review {
    /// Create a new unapproved review
    ///
    /// Range and duplicate checks live in the review engine; this constructor
    /// only assembles the record.
    pub fn new(
        id: String,
        patron_id: String,
        book_id: String,
        rating: u8,
        comment: String,
        creation_date: NaiveDateTime,
    ) -> Self {
        Review {
            id,
            patron_id,
            book_id,
            rating,
            comment,
            creation_date,
            approved: false,
        }
    }

    /// Whether the rating falls within the accepted range
    pub fn rating_in_range(rating: u8) -> bool {
        (RATING_MIN..=RATING_MAX).contains(&rating)
    }

    /// Approve the review for display; idempotent
    pub fn approve(&mut self) {
        self.approved = true;
    }
}
