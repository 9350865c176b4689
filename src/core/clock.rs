//! Time source abstraction
//!
//! The lifecycle engines never call `now()` directly; they ask an injected
//! [`Clock`] so that due-date arithmetic, overdue sweeps, and reservation
//! expiry can be driven deterministically in tests.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current date and time
pub trait Clock: Send + Sync {
    /// Current calendar date
    fn today(&self) -> NaiveDate;

    /// Current date and time
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fixed time source for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Pin the clock to the given instant
    pub fn at(now: NaiveDateTime) -> Self {
        FixedClock { now }
    }

    /// Pin the clock to midnight on the given date
    pub fn on_date(date: NaiveDate) -> Self {
        FixedClock {
            now: date.and_hms_opt(0, 0, 0).expect("midnight is always valid"),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
