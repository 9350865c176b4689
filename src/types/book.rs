//! Book catalog entry and availability counters
//!
//! This module defines the Book structure and the availability tracker:
//! the two counter mutations (`borrow` / `restock`) are the only way the
//! availability count changes, and both saturate at the boundaries instead
//! of erroring.

use serde::{Deserialize, Serialize};

/// A catalogued book with availability counters
///
/// Invariant: `0 <= available_count <= total_count` at all times. The
/// counters are mutated only through [`Book::borrow`] and [`Book::restock`],
/// never directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book identifier (UUID string)
    pub id: String,

    /// ISBN, 10 or 13 digits once separators are stripped
    pub isbn: String,

    /// Book title
    pub title: String,

    /// Author display name
    pub author: String,

    /// Publisher display name
    pub publisher: String,

    /// Year of publication
    pub publication_year: i32,

    /// Free-text genre tag
    pub genre: String,

    /// Copies currently on the shelf
    pub available_count: u32,

    /// Copies owned by the library
    pub total_count: u32,

    /// Shelf location code
    pub location: String,
}

impl Book {
    /// Whether at least one copy is available to lend
    pub fn is_available(&self) -> bool {
        self.available_count > 0
    }

    /// Take one copy off the shelf
    ///
    /// Decrements `available_count` unless it is already zero, in which case
    /// this is a silent no-op. The count never goes negative. Callers that
    /// need an error for the unavailable case must check [`Book::is_available`]
    /// first, as the loan engine does.
    pub fn borrow(&mut self) {
        if self.available_count > 0 {
            self.available_count -= 1;
        }
    }

    /// Put one copy back on the shelf
    ///
    /// Increments `available_count` unless it already equals `total_count`,
    /// in which case this is a silent no-op. The count never exceeds the
    /// total.
    pub fn restock(&mut self) {
        if self.available_count < self.total_count {
            self.available_count += 1;
        }
    }
}
