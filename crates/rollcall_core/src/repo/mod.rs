//! Entity repository over the key-value store.
//!
//! # Responsibility
//! - Provide CRUD contracts for users, employees and attendance.
//! - Apply whole-collection load → mutate → persist cycles.
//!
//! # Invariants
//! - Every mutation persists before returning (read-your-own-writes).
//! - Deleting an employee also deletes all of its attendance records.
//! - At most one attendance record exists per (employee, day) after a write.

use crate::auth::password::PasswordError;
use crate::model::ValidationError;
use crate::store::{KeyValueStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance_repo;
pub mod employee_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    Validation(ValidationError),
    Password(PasswordError),
    NotFound { entity: &'static str, id: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Password(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Password(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordError> for RepoError {
    fn from(value: PasswordError) -> Self {
        Self::Password(value)
    }
}

/// Repository implementation backed by any `KeyValueStore`.
///
/// Implements `UserRepository`, `EmployeeRepository` and
/// `AttendanceRepository`.
pub struct StoreRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store, for session pointers and reminder markers.
    pub fn store(&self) -> &S {
        &self.store
    }
}
