//! Validating fronts over the book and patron stores
//!
//! The stores themselves accept any well-formed record; the catalog and
//! registry enforce the input rules that apply when records enter the system
//! from outside: required fields, basic email/ISBN shape, and the unique-key
//! constraints (email per patron, ISBN per book).

use crate::core::record_store::RecordStore;
use crate::types::{Book, LibraryError, Patron};
use std::sync::Arc;
use uuid::Uuid;

fn has_email_shape(email: &str) -> bool {
    // Basic shape only: an '@' before the final '.'
    match (email.find('@'), email.rfind('.')) {
        (Some(at), Some(dot)) => at < dot,
        _ => false,
    }
}

/// Patron registration and lookup with uniqueness enforcement
pub struct PatronRegistry {
    patrons: Arc<RecordStore<Patron>>,
}

impl PatronRegistry {
    /// Create a registry over the given patron store
    pub fn new(patrons: Arc<RecordStore<Patron>>) -> Self {
        PatronRegistry { patrons }
    }

    /// Register a patron
    ///
    /// Assigns a UUID when the id is empty. Rejects missing name or email,
    /// malformed email, and an email already registered to another patron
    /// (case-insensitive).
    pub fn create(&self, mut patron: Patron) -> Result<Patron, LibraryError> {
        if patron.id.is_empty() {
            patron.id = Uuid::new_v4().to_string();
        }

        if patron.first_name.trim().is_empty() {
            return Err(LibraryError::validation("First name is required"));
        }
        if patron.last_name.trim().is_empty() {
            return Err(LibraryError::validation("Last name is required"));
        }
        if patron.email.trim().is_empty() {
            return Err(LibraryError::validation("Email is required"));
        }
        if !has_email_shape(&patron.email) {
            return Err(LibraryError::validation(format!(
                "Invalid email format: {}",
                patron.email
            )));
        }

        if self.search_by_email(&patron.email).is_some() {
            return Err(LibraryError::DuplicateEmail {
                email: patron.email,
            });
        }

        self.patrons.create(patron)
    }

    /// Look up a patron by id
    pub fn get(&self, id: &str) -> Option<Patron> {
        self.patrons.get(id)
    }

    /// All registered patrons
    pub fn get_all(&self) -> Vec<Patron> {
        self.patrons.get_all()
    }

    /// Remove a patron; false when the id is unknown
    pub fn delete(&self, id: &str) -> Result<bool, LibraryError> {
        self.patrons.delete(id)
    }

    /// Find a patron by email, case-insensitive
    pub fn search_by_email(&self, email: &str) -> Option<Patron> {
        self.patrons
            .get_all()
            .into_iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
    }
}

/// Book cataloguing and lookup with uniqueness enforcement
pub struct BookCatalog {
    books: Arc<RecordStore<Book>>,
}

impl BookCatalog {
    /// Create a catalog over the given book store
    pub fn new(books: Arc<RecordStore<Book>>) -> Self {
        BookCatalog { books }
    }

    /// Catalogue a book
    ///
    /// Assigns a UUID when the id is empty. Rejects a missing title, an ISBN
    /// that does not strip to 10 or 13 digits, an available count above the
    /// total, and an ISBN already catalogued (case-insensitive).
    pub fn create(&self, mut book: Book) -> Result<Book, LibraryError> {
        if book.id.is_empty() {
            book.id = Uuid::new_v4().to_string();
        }

        if book.title.trim().is_empty() {
            return Err(LibraryError::validation("Title is required"));
        }

        let isbn_digits: String = book.isbn.chars().filter(|c| c.is_ascii_digit()).collect();
        if isbn_digits.len() != 10 && isbn_digits.len() != 13 {
            return Err(LibraryError::validation(format!(
                "ISBN must be 10 or 13 digits (found: {})",
                isbn_digits.len()
            )));
        }

        if book.available_count > book.total_count {
            return Err(LibraryError::validation(format!(
                "Available count {} exceeds total count {}",
                book.available_count, book.total_count
            )));
        }

        if self.search_by_isbn(&book.isbn).is_some() {
            return Err(LibraryError::DuplicateIsbn { isbn: book.isbn });
        }

        self.books.create(book)
    }

    /// Look up a book by id
    pub fn get(&self, id: &str) -> Option<Book> {
        self.books.get(id)
    }

    /// All catalogued books
    pub fn get_all(&self) -> Vec<Book> {
        self.books.get_all()
    }

    /// Remove a book; false when the id is unknown
    pub fn delete(&self, id: &str) -> Result<bool, LibraryError> {
        self.books.delete(id)
    }

    /// Find a book by ISBN, case-insensitive
    pub fn search_by_isbn(&self, isbn: &str) -> Option<Book> {
        self.books
            .get_all()
            .into_iter()
            .find(|b| b.isbn.eq_ignore_ascii_case(isbn))
    }
}
