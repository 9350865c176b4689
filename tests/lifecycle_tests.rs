//! End-to-end lifecycle tests
//!
//! These tests drive the loan and reservation engines over real CSV files in
//! a temporary directory, then reopen the stores to verify that every
//! mutation was written back. Scenarios covered:
//! - Borrow/return flows over a shared book with contention for the last copy
//! - Role limits and due-date arithmetic
//! - The overdue sweep, its idempotence, and delay reporting
//! - Reservation placement and resolution
//! - Persistence of all four record files across process restarts

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use lending_engine::core::{
        Clock, FixedClock, LoanEngine, NotificationSink, PatronInbox, RecordStore,
        ReservationEngine, ReviewEngine,
    };
    use lending_engine::types::{
        Book, LibraryError, Loan, LoanStatus, Patron, PatronRole, Reservation, Review,
    };
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    /// Everything a scenario needs, opened over one data directory
    struct System {
        books: Arc<RecordStore<Book>>,
        patrons: Arc<RecordStore<Patron>>,
        loans: Arc<RecordStore<Loan>>,
        reservations: Arc<RecordStore<Reservation>>,
        loan_engine: LoanEngine,
        reservation_engine: ReservationEngine,
        review_engine: ReviewEngine,
    }

    /// Open (or reopen) the full system over `dir` with the clock fixed at `now`
    ///
    /// Reopening with the same directory reloads every record from its CSV
    /// file, which is how the tests verify persistence.
    fn open_system(dir: &Path, now: NaiveDateTime) -> System {
        let books = Arc::new(RecordStore::open(dir).unwrap());
        let patrons = Arc::new(RecordStore::open(dir).unwrap());
        let loans = Arc::new(RecordStore::open(dir).unwrap());
        let reservations = Arc::new(RecordStore::open(dir).unwrap());
        let reviews: Arc<RecordStore<Review>> = Arc::new(RecordStore::open(dir).unwrap());

        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(now));
        let sink: Arc<dyn NotificationSink> = Arc::new(PatronInbox::new(Arc::clone(&patrons)));

        let loan_engine = LoanEngine::new(
            Arc::clone(&loans),
            Arc::clone(&books),
            Arc::clone(&patrons),
            sink,
            Arc::clone(&clock),
        );
        let reservation_engine = ReservationEngine::new(
            Arc::clone(&reservations),
            Arc::clone(&books),
            Arc::clone(&patrons),
            Arc::clone(&clock),
        );
        let review_engine = ReviewEngine::new(
            reviews,
            Arc::clone(&books),
            Arc::clone(&patrons),
            clock,
        );

        System {
            books,
            patrons,
            loans,
            reservations,
            loan_engine,
            reservation_engine,
            review_engine,
        }
    }

    fn seed_patron(system: &System, id: &str, role: PatronRole) {
        system
            .patrons
            .create(Patron {
                id: id.to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: format!("{}@example.com", id),
                phone: "555-0100".to_string(),
                role,
                notifications: Vec::new(),
            })
            .unwrap();
    }

    fn seed_book(system: &System, id: &str, copies: u32) {
        system
            .books
            .create(Book {
                id: id.to_string(),
                isbn: format!("97800000{:05}", id.len()),
                title: format!("Title {}", id),
                author: "Author".to_string(),
                publisher: "Publisher".to_string(),
                publication_year: 1999,
                genre: "Fiction".to_string(),
                available_count: copies,
                total_count: copies,
                location: "B-2".to_string(),
            })
            .unwrap();
    }

    fn student() -> PatronRole {
        PatronRole::Student {
            major: "Literature".to_string(),
            semester: "6".to_string(),
        }
    }

    #[test]
    fn test_contention_for_the_last_copy() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 3, 1));
        seed_patron(&system, "p-a", student());
        seed_patron(&system, "p-b", student());
        seed_patron(&system, "p-c", student());
        seed_book(&system, "b-1", 2);

        let loan_a = system.loan_engine.perform_loan("p-a", "b-1").unwrap();
        system.loan_engine.perform_loan("p-b", "b-1").unwrap();

        // Both copies are out, so the third request is refused
        let refused = system.loan_engine.perform_loan("p-c", "b-1");
        assert!(matches!(
            refused,
            Err(LibraryError::BookNotAvailable { .. })
        ));

        // A return frees a copy and the refused patron can borrow
        system.loan_engine.perform_return(&loan_a.id).unwrap();
        assert!(system.loan_engine.perform_loan("p-c", "b-1").is_ok());
        assert_eq!(system.books.get("b-1").unwrap().available_count, 0);
    }

    #[test]
    fn test_borrow_then_return_restores_availability() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 3, 1));
        seed_patron(&system, "p-1", student());
        seed_book(&system, "b-1", 5);

        let loan = system.loan_engine.perform_loan("p-1", "b-1").unwrap();
        assert_eq!(system.books.get("b-1").unwrap().available_count, 4);

        system.loan_engine.perform_return(&loan.id).unwrap();
        assert_eq!(system.books.get("b-1").unwrap().available_count, 5);
    }

    #[test]
    fn test_failed_loan_leaves_no_record_behind() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 3, 1));
        seed_patron(&system, "p-1", student());
        seed_book(&system, "b-1", 0);

        assert!(system.loan_engine.perform_loan("p-1", "b-1").is_err());
        assert!(system.loans.is_empty());

        // Reopen to confirm nothing reached the file either
        let reopened = open_system(dir.path(), noon(2024, 3, 1));
        assert!(reopened.loans.is_empty());
    }

    #[test]
    fn test_student_due_date_is_loan_date_plus_fifteen() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 2, 20));
        seed_patron(&system, "p-1", student());
        seed_book(&system, "b-1", 1);

        let loan = system.loan_engine.perform_loan("p-1", "b-1").unwrap();

        assert_eq!(loan.loan_date, date(2024, 2, 20));
        // 15 days across the February boundary of a leap year
        assert_eq!(loan.estimated_return_date, date(2024, 3, 6));
    }

    #[test]
    fn test_loans_survive_a_restart() {
        let dir = TempDir::new().unwrap();
        let loan_id;
        {
            let system = open_system(dir.path(), noon(2024, 3, 1));
            seed_patron(&system, "p-1", student());
            seed_book(&system, "b-1", 2);
            loan_id = system.loan_engine.perform_loan("p-1", "b-1").unwrap().id;
        }

        let reopened = open_system(dir.path(), noon(2024, 3, 2));
        let loan = reopened.loan_engine.get(&loan_id).unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.loan_date, date(2024, 3, 1));
        assert_eq!(reopened.books.get("b-1").unwrap().available_count, 1);
        assert_eq!(reopened.patrons.len(), 1);
    }

    #[test]
    fn test_overdue_sweep_survives_a_restart() {
        let dir = TempDir::new().unwrap();
        let loan_id;
        {
            let system = open_system(dir.path(), noon(2024, 3, 1));
            seed_patron(&system, "p-1", student());
            seed_book(&system, "b-1", 1);
            loan_id = system.loan_engine.perform_loan("p-1", "b-1").unwrap().id;
        }

        // Due 2024-03-16; the sweep runs ten days later
        {
            let system = open_system(dir.path(), noon(2024, 3, 26));
            let transitioned = system.loan_engine.check_overdue().unwrap();
            assert_eq!(transitioned.len(), 1);
            assert_eq!(transitioned[0].delay_days(date(2024, 3, 26)), 10);

            // Re-running it finds nothing new
            assert!(system.loan_engine.check_overdue().unwrap().is_empty());
        }

        let reopened = open_system(dir.path(), noon(2024, 3, 27));
        assert_eq!(
            reopened.loan_engine.get(&loan_id).unwrap().status,
            LoanStatus::Overdue
        );
    }

    #[test]
    fn test_late_return_records_the_delay() {
        let dir = TempDir::new().unwrap();
        let loan_id;
        {
            let system = open_system(dir.path(), noon(2024, 1, 1));
            seed_patron(&system, "p-1", student());
            seed_book(&system, "b-1", 1);
            loan_id = system.loan_engine.perform_loan("p-1", "b-1").unwrap().id;
        }

        // Due 2024-01-16, returned 2024-01-21
        let system = open_system(dir.path(), noon(2024, 1, 21));
        let returned = system.loan_engine.perform_return(&loan_id).unwrap();

        assert_eq!(returned.actual_return_date, Some(date(2024, 1, 21)));
        assert_eq!(returned.delay_days(date(2024, 1, 21)), 5);

        // The delay lands in the patron's notification inbox
        let patron = system.patrons.get("p-1").unwrap();
        assert!(patron
            .notifications
            .iter()
            .any(|m| m.contains("Delay days: 5")));
    }

    #[test]
    fn test_student_cannot_exceed_three_loans() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 3, 1));
        seed_patron(&system, "p-1", student());
        for i in 1..=4 {
            seed_book(&system, &format!("b-{}", i), 1);
        }

        for i in 1..=3 {
            system
                .loan_engine
                .perform_loan("p-1", &format!("b-{}", i))
                .unwrap();
        }

        assert_eq!(
            system.loan_engine.perform_loan("p-1", "b-4"),
            Err(LibraryError::loan_limit_reached("p-1", 3))
        );
    }

    #[test]
    fn test_reservation_round_trip_across_restart() {
        let dir = TempDir::new().unwrap();
        let reservation_id;
        {
            let system = open_system(dir.path(), noon(2024, 3, 1));
            seed_patron(&system, "p-1", student());
            seed_book(&system, "b-1", 1);
            reservation_id = system
                .reservation_engine
                .create_reservation("p-1", "b-1")
                .unwrap()
                .id;
        }

        let system = open_system(dir.path(), noon(2024, 3, 2));
        let reservation = system.reservation_engine.get(&reservation_id).unwrap();
        assert!(reservation.active);
        assert_eq!(reservation.expiration_date, noon(2024, 3, 4));

        system
            .reservation_engine
            .complete_reservation(&reservation_id)
            .unwrap();

        let reopened = open_system(dir.path(), noon(2024, 3, 3));
        let completed = reopened.reservation_engine.get(&reservation_id).unwrap();
        assert!(completed.completed);
        assert!(!completed.active);
        assert!(reopened.reservation_engine.active_reservations().is_empty());
        assert_eq!(reopened.reservations.len(), 1);
    }

    #[test]
    fn test_review_rules_and_persistence_across_restart() {
        let dir = TempDir::new().unwrap();
        let review_id;
        {
            let system = open_system(dir.path(), noon(2024, 3, 1));
            seed_patron(&system, "p-1", student());
            seed_book(&system, "b-1", 1);
            review_id = system
                .review_engine
                .create_review("p-1", "b-1", 4, "Held up on a re-read, too")
                .unwrap()
                .id;

            // One review per patron per book
            assert_eq!(
                system.review_engine.create_review("p-1", "b-1", 2, "Again"),
                Err(LibraryError::duplicate_review("p-1", "b-1"))
            );
        }

        let system = open_system(dir.path(), noon(2024, 3, 2));
        let review = system.review_engine.get(&review_id).unwrap();
        assert!(!review.approved);
        assert_eq!(review.comment, "Held up on a re-read, too");
        // The duplicate rule holds against the reloaded store as well
        assert!(system
            .review_engine
            .create_review("p-1", "b-1", 5, "Third try")
            .is_err());

        system.review_engine.approve_review(&review_id).unwrap();
        assert_eq!(system.review_engine.average_rating("b-1"), 4.0);

        let reopened = open_system(dir.path(), noon(2024, 3, 3));
        assert!(reopened.review_engine.get(&review_id).unwrap().approved);
        assert_eq!(reopened.review_engine.average_rating("b-1"), 4.0);
    }

    #[test]
    fn test_empty_data_directory_yields_empty_stores() {
        let dir = TempDir::new().unwrap();
        let system = open_system(dir.path(), noon(2024, 3, 1));

        assert!(system.books.is_empty());
        assert!(system.patrons.is_empty());
        assert!(system.loan_engine.get_all().is_empty());
        assert!(system.reservation_engine.get_all().is_empty());
        assert!(system.review_engine.get_all().is_empty());
    }
}
