//! Patron records and role-based borrowing policy
//!
//! A patron is one of three kinds (Student, Teacher, Administrator), each
//! with its own attributes and lending terms. [`PatronRole`] is a sum type
//! carrying the role-specific fields, with the borrowing policy as a pure
//! lookup on the role.

use serde::{Deserialize, Serialize};

/// Patron variant with role-specific attributes
///
/// The role tag fully determines the borrowing policy; an unknown tag is
/// rejected when the patron is created or deserialized, so policy lookup
/// itself has no error path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatronRole {
    /// Enrolled student
    Student {
        /// Degree program
        major: String,
        /// Current semester label
        semester: String,
    },
    /// Faculty member
    Teacher {
        /// Home department
        department: String,
        /// Area of specialization
        specialization: String,
    },
    /// Library administrator
    Administrator {
        /// Administrative title
        title: String,
        /// Whether the administrator has unrestricted permissions
        full_permission: bool,
    },
}

impl PatronRole {
    /// Maximum number of simultaneously active or overdue loans
    ///
    /// | Role          | limit      |
    /// |---------------|------------|
    /// | Student       | 3          |
    /// | Teacher       | 10         |
    /// | Administrator | unbounded  |
    pub fn loan_limit(&self) -> u32 {
        match self {
            PatronRole::Student { .. } => 3,
            PatronRole::Teacher { .. } => 10,
            PatronRole::Administrator { .. } => u32::MAX,
        }
    }

    /// Loan duration in days for this role
    ///
    /// Students get 15 days, teachers 30, administrators 60.
    pub fn loan_duration_days(&self) -> u64 {
        match self {
            PatronRole::Student { .. } => 15,
            PatronRole::Teacher { .. } => 30,
            PatronRole::Administrator { .. } => 60,
        }
    }

    /// Role tag as stored in the CSV `type` column
    pub fn tag(&self) -> &'static str {
        match self {
            PatronRole::Student { .. } => "STUDENT",
            PatronRole::Teacher { .. } => "TEACHER",
            PatronRole::Administrator { .. } => "ADMINISTRATOR",
        }
    }
}

/// A library member who can borrow and reserve books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patron {
    /// Unique patron identifier (UUID string)
    pub id: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Contact email, unique across patrons
    pub email: String,

    /// Contact phone number (may be empty)
    pub phone: String,

    /// Role variant with its role-specific fields
    pub role: PatronRole,

    /// Human-readable messages delivered to this patron
    pub notifications: Vec<String>,
}

impl Patron {
    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
