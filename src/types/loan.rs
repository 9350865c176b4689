//! Loan records and their status machine
//!
//! A loan is created Active, moves to Overdue when an explicit sweep finds
//! its due date in the past, and moves to Completed when the book comes back.
//! Completed is terminal.
//!
//! All date-dependent predicates take the reference date as a parameter so
//! the lifecycle can be exercised deterministically in tests; the engines
//! supply it from their [`Clock`](crate::core::Clock).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::LibraryError;

/// Loan status
///
/// `Active → Overdue` on sweep, `Active|Overdue → Completed` on return.
/// A Completed loan never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Book is out and not yet past its due date (as far as sweeps have seen)
    Active,
    /// Book is out past its due date
    Overdue,
    /// Book has been returned; terminal
    Completed,
}

impl LoanStatus {
    /// Status name as stored in the CSV `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::Completed => "COMPLETED",
        }
    }

    /// Parse a stored status name
    pub fn parse(value: &str) -> Result<Self, LibraryError> {
        match value {
            "ACTIVE" => Ok(LoanStatus::Active),
            "OVERDUE" => Ok(LoanStatus::Overdue),
            "COMPLETED" => Ok(LoanStatus::Completed),
            other => Err(LibraryError::parse(format!(
                "Invalid loan status '{}'",
                other
            ))),
        }
    }

    /// Whether the loan counts against the patron's loan limit
    pub fn is_outstanding(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Overdue)
    }
}

/// A record of a book lent to a patron
///
/// Holds foreign-key ids for the patron and book rather than embedded
/// entities; related display data is a read-time join done by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan identifier (UUID string)
    pub id: String,

    /// Borrowing patron's id
    pub patron_id: String,

    /// Borrowed book's id
    pub book_id: String,

    /// Date the loan was created
    pub loan_date: NaiveDate,

    /// Due date: `loan_date` plus the role's loan duration
    pub estimated_return_date: NaiveDate,

    /// Date the book actually came back; absent until returned
    pub actual_return_date: Option<NaiveDate>,

    /// Current lifecycle status
    pub status: LoanStatus,

    /// Free-text observations
    pub observations: String,
}

impl Loan {
    /// Create a new Active loan
    pub fn new(
        id: String,
        patron_id: String,
        book_id: String,
        loan_date: NaiveDate,
        estimated_return_date: NaiveDate,
    ) -> Self {
        Loan {
            id,
            patron_id,
            book_id,
            loan_date,
            estimated_return_date,
            actual_return_date: None,
            status: LoanStatus::Active,
            observations: String::new(),
        }
    }

    /// Whether the loan is Active with its due date in the past
    ///
    /// Pure predicate; does not mutate status. Completed and already-Overdue
    /// loans are never reported, which makes the sweep idempotent.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == LoanStatus::Active && today > self.estimated_return_date
    }

    /// Transition to Overdue if the predicate holds
    pub fn mark_overdue(&mut self, today: NaiveDate) {
        if self.is_overdue(today) {
            self.status = LoanStatus::Overdue;
        }
    }

    /// Complete the loan: stamp the return date and move to Completed
    pub fn complete(&mut self, today: NaiveDate) {
        self.actual_return_date = Some(today);
        self.status = LoanStatus::Completed;
    }

    /// Days past the due date, clamped at zero
    ///
    /// For a returned loan this is the exact calendar difference between the
    /// actual and estimated return dates; for a loan still out past its due
    /// date it is counted up to `today`; early or on-time returns yield 0.
    pub fn delay_days(&self, today: NaiveDate) -> i64 {
        let late_by = match self.actual_return_date {
            Some(actual) => (actual - self.estimated_return_date).num_days(),
            None if self.status.is_outstanding() && today > self.estimated_return_date => {
                (today - self.estimated_return_date).num_days()
            }
            None => 0,
        };
        late_by.max(0)
    }
}
