//! Generic concurrent record store with CSV persistence
//!
//! One [`RecordStore`] instance backs each entity kind (books, patrons,
//! loans, reservations, reviews). The in-memory DashMap is the concurrency
//! boundary; every mutation rewrites the entire backing file, which is
//! acceptable for the small datasets this system manages.
//!
//! # Persistence Contract
//!
//! - A missing backing file yields an empty store, not an error.
//! - Rows that fail to parse are skipped with a warning; loading continues.
//! - A failed file rewrite rolls back the in-memory mutation and surfaces
//!   the error, so the map and the file cannot silently diverge.
//! - Records are written sorted by id for deterministic output.

use crate::io::rows;
use crate::types::{Book, LibraryError, Loan, Patron, Reservation, Review};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A domain type that can live in a [`RecordStore`]
///
/// Binds the type to its backing file name and its CSV row representation.
/// Conversions are the pure functions from [`crate::io::rows`].
pub trait StoredRecord: Clone + Send + Sync + 'static {
    /// CSV row representation of this record
    type Row: Serialize + DeserializeOwned;

    /// Backing file name under the data directory
    const FILE_NAME: &'static str;

    /// Unique identifier of this record
    fn record_id(&self) -> &str;

    /// Convert to the CSV row representation
    fn to_row(&self) -> Self::Row;

    /// Convert from the CSV row representation
    fn from_row(row: Self::Row) -> Result<Self, LibraryError>;
}

impl StoredRecord for Book {
    type Row = rows::BookRow;
    const FILE_NAME: &'static str = "books.csv";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Self::Row {
        rows::book_to_row(self)
    }

    fn from_row(row: Self::Row) -> Result<Self, LibraryError> {
        rows::book_from_row(row)
    }
}

impl StoredRecord for Patron {
    type Row = rows::PatronRow;
    const FILE_NAME: &'static str = "patrons.csv";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Self::Row {
        rows::patron_to_row(self)
    }

    fn from_row(row: Self::Row) -> Result<Self, LibraryError> {
        rows::patron_from_row(row)
    }
}

impl StoredRecord for Loan {
    type Row = rows::LoanRow;
    const FILE_NAME: &'static str = "loans.csv";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Self::Row {
        rows::loan_to_row(self)
    }

    fn from_row(row: Self::Row) -> Result<Self, LibraryError> {
        rows::loan_from_row(row)
    }
}

impl StoredRecord for Reservation {
    type Row = rows::ReservationRow;
    const FILE_NAME: &'static str = "reservations.csv";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Self::Row {
        rows::reservation_to_row(self)
    }

    fn from_row(row: Self::Row) -> Result<Self, LibraryError> {
        rows::reservation_from_row(row)
    }
}

impl StoredRecord for Review {
    type Row = rows::ReviewRow;
    const FILE_NAME: &'static str = "reviews.csv";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Self::Row {
        rows::review_to_row(self)
    }

    fn from_row(row: Self::Row) -> Result<Self, LibraryError> {
        rows::review_from_row(row)
    }
}

/// Concurrent keyed container for one entity kind, persisted to one CSV file
pub struct RecordStore<T: StoredRecord> {
    records: DashMap<String, T>,
    path: PathBuf,
}

impl<T: StoredRecord> RecordStore<T> {
    /// Open the store for its entity kind under the given data directory
    ///
    /// Creates the directory if needed and loads any existing backing file.
    /// A missing file yields an empty store.
    pub fn open(data_dir: &Path) -> Result<Self, LibraryError> {
        fs::create_dir_all(data_dir)?;

        let store = RecordStore {
            records: DashMap::new(),
            path: data_dir.join(T::FILE_NAME),
        };
        store.load()?;
        Ok(store)
    }

    /// Read all rows from the backing file into the map
    ///
    /// Rows that fail deserialization or conversion are skipped with a
    /// warning rather than aborting the load.
    fn load(&self) -> Result<(), LibraryError> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(&self.path)?;

        for (index, result) in reader.deserialize::<T::Row>().enumerate() {
            // Line 1 is the header
            let line = index as u64 + 2;
            match result.map_err(LibraryError::from).and_then(T::from_row) {
                Ok(record) => {
                    self.records.insert(record.record_id().to_string(), record);
                }
                Err(e) => {
                    tracing::warn!("Skipping row at line {} of {}: {}", line, T::FILE_NAME, e);
                }
            }
        }

        Ok(())
    }

    /// Rewrite the entire backing file from the current map contents
    fn flush(&self) -> Result<(), LibraryError> {
        let mut records: Vec<T> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by(|a, b| a.record_id().cmp(b.record_id()));

        let mut writer = WriterBuilder::new().from_path(&self.path)?;
        for record in &records {
            writer.serialize(record.to_row())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Insert a record and persist the store
    ///
    /// Replaces any existing record with the same id. If the file rewrite
    /// fails, the previous state is restored and the error returned.
    pub fn create(&self, record: T) -> Result<T, LibraryError> {
        let id = record.record_id().to_string();
        let previous = self.records.insert(id.clone(), record.clone());

        if let Err(e) = self.flush() {
            match previous {
                Some(prev) => {
                    self.records.insert(id, prev);
                }
                None => {
                    self.records.remove(&id);
                }
            }
            return Err(e);
        }

        Ok(record)
    }

    /// Get a record by id
    pub fn get(&self, id: &str) -> Option<T> {
        self.records.get(id).map(|r| r.value().clone())
    }

    /// All records, sorted by id for deterministic output
    pub fn get_all(&self) -> Vec<T> {
        let mut records: Vec<T> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by(|a, b| a.record_id().cmp(b.record_id()));
        records
    }

    /// Replace an existing record and persist the store
    ///
    /// Returns `Ok(None)` when no record with the id exists; the caller maps
    /// that to its entity-specific not-found error.
    pub fn update(&self, id: &str, record: T) -> Result<Option<T>, LibraryError> {
        let previous = match self.records.get(id) {
            Some(existing) => existing.value().clone(),
            None => return Ok(None),
        };

        self.records.insert(id.to_string(), record.clone());

        if let Err(e) = self.flush() {
            self.records.insert(id.to_string(), previous);
            return Err(e);
        }

        Ok(Some(record))
    }

    /// Remove a record and persist the store
    ///
    /// Returns `Ok(false)` when no record with the id exists.
    pub fn delete(&self, id: &str) -> Result<bool, LibraryError> {
        let removed = match self.records.remove(id) {
            Some((_, record)) => record,
            None => return Ok(false),
        };

        if let Err(e) = self.flush() {
            self.records.insert(id.to_string(), removed);
            return Err(e);
        }

        Ok(true)
    }

    /// Mutate a record in place without rewriting the backing file
    ///
    /// Used for fields outside the CSV schema (the patron notification
    /// inbox) and for batch transitions that end with a single [`persist`]
    /// call. Returns false when the id is absent.
    ///
    /// [`persist`]: RecordStore::persist
    pub fn modify<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.records.get_mut(id) {
            Some(mut record) => {
                f(record.value_mut());
                true
            }
            None => false,
        }
    }

    /// Rewrite the backing file from the current in-memory records
    ///
    /// Companion to [`modify`](RecordStore::modify) for callers that apply
    /// several in-place changes and want one file rewrite at the end. There
    /// is no rollback here; callers re-run their (idempotent) batch if the
    /// write fails.
    pub fn persist(&self) -> Result<(), LibraryError> {
        self.flush()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanStatus;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(id: &str, available: u32, total: u32) -> Book {
        Book {
            id: id.to_string(),
            isbn: format!("978000000000{}", id.len()),
            title: format!("Title {}", id),
            author: "Author".to_string(),
            publisher: "Publisher".to_string(),
            publication_year: 2000,
            genre: "Fiction".to_string(),
            available_count: available,
            total_count: total,
            location: "A-1".to_string(),
        }
    }

    fn loan(id: &str, observations: &str) -> Loan {
        let mut l = Loan::new(
            id.to_string(),
            "p-1".to_string(),
            "b-1".to_string(),
            date(2024, 1, 1),
            date(2024, 1, 16),
        );
        l.observations = observations.to_string();
        l
    }

    #[test]
    fn test_open_with_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_and_get() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();

        store.create(book("b-1", 2, 3)).unwrap();

        let fetched = store.get("b-1").unwrap();
        assert_eq!(fetched.available_count, 2);
        assert!(store.get("b-2").is_none());
    }

    #[test]
    fn test_create_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
            store.create(book("b-1", 2, 3)).unwrap();
            store.create(book("b-2", 1, 1)).unwrap();
        }

        let reopened: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("b-2").unwrap().total_count, 1);
    }

    #[test]
    fn test_update_existing_record() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
        store.create(book("b-1", 2, 3)).unwrap();

        let mut updated = book("b-1", 2, 3);
        updated.borrow();
        let result = store.update("b-1", updated).unwrap();

        assert!(result.is_some());
        assert_eq!(store.get("b-1").unwrap().available_count, 1);
    }

    #[test]
    fn test_update_missing_record_returns_none() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();

        let result = store.update("b-404", book("b-404", 1, 1)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_record() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
        store.create(book("b-1", 2, 3)).unwrap();

        assert!(store.delete("b-1").unwrap());
        assert!(store.get("b-1").is_none());
        assert!(!store.delete("b-1").unwrap());
    }

    #[test]
    fn test_get_all_sorted_by_id() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Book> = RecordStore::open(dir.path()).unwrap();
        store.create(book("b-3", 1, 1)).unwrap();
        store.create(book("b-1", 1, 1)).unwrap();
        store.create(book("b-2", 1, 1)).unwrap();

        let ids: Vec<String> = store.get_all().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["b-1", "b-2", "b-3"]);
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loans.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "id,patronId,bookId,loanDate,estimatedReturnDate,actualReturnDate,status,observations"
        )
        .unwrap();
        writeln!(file, "l-1,p-1,b-1,2024-01-01,2024-01-16,,ACTIVE,").unwrap();
        writeln!(file, "l-2,p-1,b-1,not-a-date,2024-01-16,,ACTIVE,").unwrap();
        writeln!(file, "l-3,p-1").unwrap();
        writeln!(file, "l-4,p-2,b-2,2024-02-01,2024-03-02,,ACTIVE,renewed once").unwrap();
        drop(file);

        let store: RecordStore<Loan> = RecordStore::open(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("l-1").is_some());
        assert!(store.get("l-4").is_some());
    }

    #[test]
    fn test_loan_round_trip_with_comma_and_quote() {
        let dir = TempDir::new().unwrap();
        let observations = "returned wet, cover says \"first edition\"";
        {
            let store: RecordStore<Loan> = RecordStore::open(dir.path()).unwrap();
            store.create(loan("l-1", observations)).unwrap();
            store.create(loan("l-2", "plain note")).unwrap();
            store.create(loan("l-3", "")).unwrap();
        }

        let reopened: RecordStore<Loan> = RecordStore::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 3);

        let restored = reopened.get("l-1").unwrap();
        assert_eq!(restored.observations, observations);
        assert_eq!(restored.status, LoanStatus::Active);
        assert_eq!(restored.loan_date, date(2024, 1, 1));
    }

    #[test]
    fn test_patron_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let patron = Patron {
            id: "p-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            role: crate::types::PatronRole::Teacher {
                department: "Mathematics".to_string(),
                specialization: "Analysis, applied".to_string(),
            },
            notifications: Vec::new(),
        };

        {
            let store: RecordStore<Patron> = RecordStore::open(dir.path()).unwrap();
            store.create(patron.clone()).unwrap();
        }

        let reopened: RecordStore<Patron> = RecordStore::open(dir.path()).unwrap();
        let restored = reopened.get("p-1").unwrap();
        assert_eq!(restored.role, patron.role);
        assert_eq!(restored.email, patron.email);
    }
}
