//! Loan lifecycle engine
//!
//! Orchestrates loan creation, returns, and the overdue sweep by
//! coordinating the patron, book, and loan stores.
//!
//! The engine enforces the lending business rules:
//! - A loan requires an existing patron and an available copy of the book
//! - A patron's active and overdue loans never exceed their role's limit
//! - The due date is the loan date plus the role's loan duration
//! - A completed loan is terminal; returning it again is rejected
//!
//! Loan creation and return each touch two stores (book counters plus the
//! loan record). A coarse engine-level mutex serializes these mutations so
//! two concurrent requests for the last copy of a book cannot both pass the
//! availability check.

use chrono::Days;
use crate::core::clock::Clock;
use crate::core::notify::NotificationSink;
use crate::core::record_store::RecordStore;
use crate::types::{Book, LibraryError, Loan, LoanStatus, Patron};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Loan lifecycle engine
///
/// Holds shared handles to the three stores it coordinates, a notification
/// sink, and a clock. All dependencies are injected at construction.
pub struct LoanEngine {
    loans: Arc<RecordStore<Loan>>,
    books: Arc<RecordStore<Book>>,
    patrons: Arc<RecordStore<Patron>>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    /// Serializes check-then-act sequences across the book and loan stores
    mutation_lock: Mutex<()>,
}

impl LoanEngine {
    /// Create a new engine over the given stores
    pub fn new(
        loans: Arc<RecordStore<Loan>>,
        books: Arc<RecordStore<Book>>,
        patrons: Arc<RecordStore<Patron>>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        LoanEngine {
            loans,
            books,
            patrons,
            sink,
            clock,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Lend a book to a patron
    ///
    /// Validates that both exist, that a copy is available, and that the
    /// patron is under their role's loan limit (counting Active and Overdue
    /// loans). On success the book's availability is decremented, both
    /// records are persisted, and the patron is notified with the title and
    /// due date.
    ///
    /// # Errors
    ///
    /// - `PatronNotFound` / `BookNotFound` if either id is unknown
    /// - `BookNotAvailable` if no copy is on the shelf
    /// - `LoanLimitReached` if the patron is at their limit
    /// - `Io` / `Parse` if persisting either store fails (the in-memory
    ///   mutation is rolled back by the store)
    pub fn perform_loan(&self, patron_id: &str, book_id: &str) -> Result<Loan, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let patron = self
            .patrons
            .get(patron_id)
            .ok_or_else(|| LibraryError::patron_not_found(patron_id))?;
        let mut book = self
            .books
            .get(book_id)
            .ok_or_else(|| LibraryError::book_not_found(book_id))?;

        if !book.is_available() {
            return Err(LibraryError::book_not_available(&book.title));
        }

        let outstanding = self.count_outstanding(patron_id);
        let limit = patron.role.loan_limit();
        if outstanding >= limit {
            return Err(LibraryError::loan_limit_reached(patron_id, limit));
        }

        let loan_date = self.clock.today();
        let estimated_return_date = loan_date + Days::new(patron.role.loan_duration_days());

        let loan = Loan::new(
            Uuid::new_v4().to_string(),
            patron_id.to_string(),
            book_id.to_string(),
            loan_date,
            estimated_return_date,
        );

        book.borrow();
        self.books.update(book_id, book.clone())?;
        let loan = self.loans.create(loan)?;

        tracing::info!(
            loan = %loan.id,
            patron = patron_id,
            book = book_id,
            due = %estimated_return_date,
            "Loan performed"
        );
        self.sink.notify(
            patron_id,
            &format!(
                "Loan performed: {}. Return date: {}",
                book.title, estimated_return_date
            ),
        );

        Ok(loan)
    }

    /// Take a book back and complete its loan
    ///
    /// Stamps the actual return date, moves the loan to Completed, restocks
    /// the book, persists both records, and notifies the patron (including
    /// the delay in days when the return is late).
    ///
    /// # Errors
    ///
    /// - `LoanNotFound` if the loan id is unknown
    /// - `BookNotFound` / `PatronNotFound` if the referenced records are
    ///   missing (should not occur, but is checked)
    /// - `LoanAlreadyReturned` if the loan is already Completed
    /// - `Io` / `Parse` if persisting either store fails
    pub fn perform_return(&self, loan_id: &str) -> Result<Loan, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut loan = self
            .loans
            .get(loan_id)
            .ok_or_else(|| LibraryError::loan_not_found(loan_id))?;

        if loan.status == LoanStatus::Completed {
            return Err(LibraryError::LoanAlreadyReturned {
                id: loan_id.to_string(),
            });
        }

        let mut book = self
            .books
            .get(&loan.book_id)
            .ok_or_else(|| LibraryError::book_not_found(&loan.book_id))?;
        let patron = self
            .patrons
            .get(&loan.patron_id)
            .ok_or_else(|| LibraryError::patron_not_found(&loan.patron_id))?;

        let today = self.clock.today();
        loan.complete(today);
        book.restock();

        self.books.update(&book.id, book.clone())?;
        self.loans.update(loan_id, loan.clone())?;

        let delay = loan.delay_days(today);
        tracing::info!(
            loan = loan_id,
            patron = %patron.id,
            delay_days = delay,
            "Return performed"
        );

        let mut message = format!("Return performed: {}", book.title);
        if delay > 0 {
            message.push_str(&format!(". Delay days: {}", delay));
        }
        self.sink.notify(&patron.id, &message);

        Ok(loan)
    }

    /// Sweep all loans and mark overdue the Active ones past their due date
    ///
    /// Notifies each affected patron with the current delay. Idempotent:
    /// already-Overdue loans are not touched, Completed loans never are.
    /// The store is persisted once at the end of the sweep; the sweep can
    /// safely be re-run if that write fails.
    ///
    /// Returns the loans that transitioned during this sweep. There is no
    /// background scheduler; this must be invoked externally.
    pub fn check_overdue(&self) -> Result<Vec<Loan>, LibraryError> {
        let _guard = self
            .mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let today = self.clock.today();
        let mut transitioned = Vec::new();

        for loan in self.loans.get_all() {
            if !loan.is_overdue(today) {
                continue;
            }

            self.loans.modify(&loan.id, |l| l.mark_overdue(today));

            // Re-read so the returned records carry the new status
            if let Some(updated) = self.loans.get(&loan.id) {
                let title = self
                    .books
                    .get(&updated.book_id)
                    .map(|b| b.title)
                    .unwrap_or_else(|| updated.book_id.clone());
                self.sink.notify(
                    &updated.patron_id,
                    &format!(
                        "Loan overdue: {}. Delay days: {}",
                        title,
                        updated.delay_days(today)
                    ),
                );
                transitioned.push(updated);
            }
        }

        if !transitioned.is_empty() {
            self.loans.persist()?;
            tracing::info!(count = transitioned.len(), "Overdue sweep marked loans");
        }

        Ok(transitioned)
    }

    /// Look up a loan by id
    pub fn get(&self, id: &str) -> Option<Loan> {
        self.loans.get(id)
    }

    /// All loans, sorted by id
    pub fn get_all(&self) -> Vec<Loan> {
        self.loans.get_all()
    }

    /// All loans held by the given patron
    pub fn loans_for_patron(&self, patron_id: &str) -> Vec<Loan> {
        self.loans
            .get_all()
            .into_iter()
            .filter(|l| l.patron_id == patron_id)
            .collect()
    }

    /// All loans currently in the given status
    pub fn loans_with_status(&self, status: LoanStatus) -> Vec<Loan> {
        self.loans
            .get_all()
            .into_iter()
            .filter(|l| l.status == status)
            .collect()
    }

    fn count_outstanding(&self, patron_id: &str) -> u32 {
        self.loans
            .get_all()
            .iter()
            .filter(|l| l.patron_id == patron_id && l.status.is_outstanding())
            .count() as u32
    }
}
