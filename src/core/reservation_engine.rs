//! Reservation lifecycle engine
//!
//! Handles placing, cancelling, and completing reservations. A reservation
//! is a short hold on an available book: it is created active with a fixed
//! three-day pickup window and ends by being cancelled or completed. It does
//! not take a copy off the shelf; availability only changes when a loan is
//! made.

use chrono::Days;
use crate::core::clock::Clock;
use crate::core::record_store::RecordStore;
use crate::types::{Book, LibraryError, Patron, Reservation, RESERVATION_WINDOW_DAYS};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Reservation lifecycle engine
pub struct ReservationEngine {
    reservations: Arc<RecordStore<Reservation>>,
    books: Arc<RecordStore<Book>>,
    patrons: Arc<RecordStore<Patron>>,
    clock: Arc<dyn Clock>,
    mutation_lock: Mutex<()>,
}

impl ReservationEngine {
    /// Create a new engine over the given stores
    pub fn new(
        reservations: Arc<RecordStore<Reservation>>,
        books: Arc<RecordStore<Book>>,
        patrons: Arc<RecordStore<Patron>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ReservationEngine {
            reservations,
            books,
            patrons,
            clock,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Place a reservation on an available book
    ///
    /// The reservation is created active, stamped with the current time, and
    /// expires exactly [`RESERVATION_WINDOW_DAYS`] days later.
    ///
    /// # Errors
    ///
    /// - `PatronNotFound` / `BookNotFound` if either id is unknown
    /// - `BookNotAvailable` if no copy is on the shelf
    /// - `Io` / `Parse` if persisting the store fails
    pub fn create_reservation(
        &self,
        patron_id: &str,
        book_id: &str,
    ) -> Result<Reservation, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.patrons
            .get(patron_id)
            .ok_or_else(|| LibraryError::patron_not_found(patron_id))?;
        let book = self
            .books
            .get(book_id)
            .ok_or_else(|| LibraryError::book_not_found(book_id))?;

        if !book.is_available() {
            return Err(LibraryError::book_not_available(&book.title));
        }

        let reserved_at = self.clock.now();
        let expires_at = reserved_at + Days::new(RESERVATION_WINDOW_DAYS);

        let reservation = Reservation::new(
            Uuid::new_v4().to_string(),
            patron_id.to_string(),
            book_id.to_string(),
            reserved_at,
            expires_at,
        );
        let reservation = self.reservations.create(reservation)?;

        tracing::info!(
            reservation = %reservation.id,
            patron = patron_id,
            book = book_id,
            expires = %expires_at,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Cancel an active reservation
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the id is unknown
    /// - `ReservationNotActive` if it was already cancelled or completed
    /// - `Io` / `Parse` if persisting the store fails
    pub fn cancel_reservation(&self, id: &str) -> Result<Reservation, LibraryError> {
        self.finish(id, |r| r.cancel(), "Reservation cancelled")
    }

    /// Complete an active reservation (the patron picked the book up)
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the id is unknown
    /// - `ReservationNotActive` if it was already cancelled or completed
    /// - `Io` / `Parse` if persisting the store fails
    pub fn complete_reservation(&self, id: &str) -> Result<Reservation, LibraryError> {
        self.finish(id, |r| r.complete(), "Reservation completed")
    }

    fn finish<F>(&self, id: &str, transition: F, event: &str) -> Result<Reservation, LibraryError>
    where
        F: FnOnce(&mut Reservation),
    {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut reservation = self
            .reservations
            .get(id)
            .ok_or_else(|| LibraryError::reservation_not_found(id))?;

        if !reservation.active {
            return Err(LibraryError::ReservationNotActive { id: id.to_string() });
        }

        transition(&mut reservation);
        self.reservations.update(id, reservation.clone())?;

        tracing::info!(reservation = id, "{}", event);
        Ok(reservation)
    }

    /// Look up a reservation by id
    pub fn get(&self, id: &str) -> Option<Reservation> {
        self.reservations.get(id)
    }

    /// All reservations, sorted by id
    pub fn get_all(&self) -> Vec<Reservation> {
        self.reservations.get_all()
    }

    /// All reservations still active
    pub fn active_reservations(&self) -> Vec<Reservation> {
        self.reservations
            .get_all()
            .into_iter()
            .filter(|r| r.active)
            .collect()
    }

    /// All reservations placed by the given patron
    pub fn reservations_for_patron(&self, patron_id: &str) -> Vec<Reservation> {
        self.reservations
            .get_all()
            .into_iter()
            .filter(|r| r.patron_id == patron_id)
            .collect()
    }
}
