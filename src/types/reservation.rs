//! Reservation records
//!
//! A reservation holds a book for a patron for a bounded window. It is
//! created active and not completed; cancelling clears the active flag,
//! completing clears it and sets the completed flag. Expiry is a derived
//! predicate on the expiration timestamp, never a stored state.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Days a reservation holds a book before it expires
pub const RESERVATION_WINDOW_DAYS: u64 = 3;

/// A record holding a book for a patron for a bounded window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation identifier (UUID string)
    pub id: String,

    /// Reserving patron's id
    pub patron_id: String,

    /// Reserved book's id
    pub book_id: String,

    /// When the reservation was placed
    pub reservation_date: NaiveDateTime,

    /// When the hold lapses: `reservation_date` plus the fixed window
    pub expiration_date: NaiveDateTime,

    /// Whether the hold is still in force
    pub active: bool,

    /// Whether the hold was converted into a loan
    pub completed: bool,
}

impl Reservation {
    /// Create a new active, non-completed reservation
    pub fn new(
        id: String,
        patron_id: String,
        book_id: String,
        reservation_date: NaiveDateTime,
        expiration_date: NaiveDateTime,
    ) -> Self {
        Reservation {
            id,
            patron_id,
            book_id,
            reservation_date,
            expiration_date,
            active: true,
            completed: false,
        }
    }

    /// Whether the hold window has lapsed
    ///
    /// Pure predicate; expiry never mutates the stored flags.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expiration_date
    }

    /// Cancel the hold: active becomes false, completed stays false
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Complete the hold: active becomes false, completed becomes true
    pub fn complete(&mut self) {
        self.active = false;
        self.completed = true;
    }
}
