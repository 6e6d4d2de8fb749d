//! Core use-case services.
//!
//! # Responsibility
//! - Apply authorization and validation before delegating to repositories.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - A rejected operation applies nothing.
//! - Permission checks use the session's current user on every call.

use crate::model::ValidationError;
use crate::repo::RepoError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance_service;
pub mod employee_service;
pub mod notification_log;
pub mod reminder;
pub mod report;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error surfaced to callers with a human-readable reason.
#[derive(Debug)]
pub enum ServiceError {
    /// Input was rejected; nothing was applied.
    Validation(ValidationError),
    /// The active session may not perform this action.
    PermissionDenied(&'static str),
    EmployeeNotFound(String),
    UserNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PermissionDenied(action) => write!(f, "permission denied: {action}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Repo(RepoError::Store(value))
    }
}
