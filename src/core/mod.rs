//! Core business logic module
//!
//! This module contains the core lending components:
//! - `record_store` - Generic CSV-backed record storage
//! - `catalog` - Book catalog and patron registry management
//! - `loan_engine` - Loan lifecycle orchestration
//! - `reservation_engine` - Reservation lifecycle orchestration
//! - `review_engine` - Review submission and approval
//! - `clock` - Time source abstraction for deterministic tests
//! - `notify` - Patron notification delivery

pub mod catalog;
pub mod clock;
pub mod loan_engine;
pub mod notify;
pub mod record_store;
pub mod reservation_engine;
pub mod review_engine;

pub use catalog::{BookCatalog, PatronRegistry};
pub use clock::{Clock, FixedClock, SystemClock};
pub use loan_engine::LoanEngine;
pub use notify::{NotificationSink, PatronInbox};
pub use record_store::{RecordStore, StoredRecord};
pub use reservation_engine::ReservationEngine;
pub use review_engine::ReviewEngine;
