//! Review lifecycle engine
//!
//! Handles submitting, approving, and deleting book reviews. A review is
//! created unapproved; only approved reviews count toward a book's average
//! rating. The engine enforces the review rules:
//! - A review requires an existing patron and book
//! - The rating must lie between 1 and 5 inclusive
//! - The comment is required
//! - A patron may review a given book at most once

use crate::core::clock::Clock;
use crate::core::record_store::RecordStore;
use crate::types::{Book, LibraryError, Patron, Review};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Review lifecycle engine
pub struct ReviewEngine {
    reviews: Arc<RecordStore<Review>>,
    books: Arc<RecordStore<Book>>,
    patrons: Arc<RecordStore<Patron>>,
    clock: Arc<dyn Clock>,
    mutation_lock: Mutex<()>,
}

impl ReviewEngine {
    /// Create a new engine over the given stores
    pub fn new(
        reviews: Arc<RecordStore<Review>>,
        books: Arc<RecordStore<Book>>,
        patrons: Arc<RecordStore<Patron>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ReviewEngine {
            reviews,
            books,
            patrons,
            clock,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Submit a review of a book
    ///
    /// The review is created unapproved and stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `PatronNotFound` / `BookNotFound` if either id is unknown
    /// - `RatingOutOfRange` if the rating is not between 1 and 5
    /// - `Validation` if the comment is empty
    /// - `DuplicateReview` if the patron already reviewed this book
    /// - `Io` / `Parse` if persisting the store fails
    pub fn create_review(
        &self,
        patron_id: &str,
        book_id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Review, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.patrons
            .get(patron_id)
            .ok_or_else(|| LibraryError::patron_not_found(patron_id))?;
        self.books
            .get(book_id)
            .ok_or_else(|| LibraryError::book_not_found(book_id))?;

        if !Review::rating_in_range(rating) {
            return Err(LibraryError::RatingOutOfRange { rating });
        }
        if comment.trim().is_empty() {
            return Err(LibraryError::validation("Comment is required"));
        }
        if self.has_reviewed(patron_id, book_id) {
            return Err(LibraryError::duplicate_review(patron_id, book_id));
        }

        let review = Review::new(
            Uuid::new_v4().to_string(),
            patron_id.to_string(),
            book_id.to_string(),
            rating,
            comment.to_string(),
            self.clock.now(),
        );
        let review = self.reviews.create(review)?;

        tracing::info!(
            review = %review.id,
            patron = patron_id,
            book = book_id,
            rating,
            "Review submitted"
        );

        Ok(review)
    }

    /// Approve a review for display; re-approving is a no-op
    ///
    /// # Errors
    ///
    /// - `ReviewNotFound` if the id is unknown
    /// - `Io` / `Parse` if persisting the store fails
    pub fn approve_review(&self, id: &str) -> Result<Review, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut review = self
            .reviews
            .get(id)
            .ok_or_else(|| LibraryError::review_not_found(id))?;

        review.approve();
        self.reviews.update(id, review.clone())?;

        tracing::info!(review = id, "Review approved");
        Ok(review)
    }

    /// Delete a review; returns false when the id is unknown
    pub fn delete_review(&self, id: &str) -> Result<bool, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.reviews.delete(id)
    }

    /// Look up a review by id
    pub fn get(&self, id: &str) -> Option<Review> {
        self.reviews.get(id)
    }

    /// All reviews, sorted by id
    pub fn get_all(&self) -> Vec<Review> {
        self.reviews.get_all()
    }

    /// All reviews of the given book
    pub fn reviews_for_book(&self, book_id: &str) -> Vec<Review> {
        self.reviews
            .get_all()
            .into_iter()
            .filter(|r| r.book_id == book_id)
            .collect()
    }

    /// All reviews written by the given patron
    pub fn reviews_for_patron(&self, patron_id: &str) -> Vec<Review> {
        self.reviews
            .get_all()
            .into_iter()
            .filter(|r| r.patron_id == patron_id)
            .collect()
    }

    /// All approved reviews
    pub fn approved_reviews(&self) -> Vec<Review> {
        self.reviews
            .get_all()
            .into_iter()
            .filter(|r| r.approved)
            .collect()
    }

    /// Mean rating of a book over its approved reviews; 0.0 when it has none
    pub fn average_rating(&self, book_id: &str) -> f64 {
        let ratings: Vec<u8> = self
            .reviews
            .get_all()
            .into_iter()
            .filter(|r| r.book_id == book_id && r.approved)
            .map(|r| r.rating)
            .collect();

        if ratings.is_empty() {
            return 0.0;
        }
        ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64
    }

    fn has_reviewed(&self, patron_id: &str, book_id: &str) -> bool {
        self.reviews
            .get_all()
            .iter()
            .any(|r| r.patron_id == patron_id && r.book_id == book_id)
    }
}
