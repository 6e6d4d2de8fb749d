//! Canonical records persisted by the tracker.
//!
//! # Responsibility
//! - Define one schema per entity, with camelCase JSON field names.
//! - Absorb legacy shapes (missing status/permissions, plaintext passwords)
//!   in a single normalization step at load time.
//!
//! # Invariants
//! - At most one attendance record exists per (employee, day).
//! - Admin role implies full permissions regardless of stored fields.

use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance;
pub mod employee;
pub mod notification;
pub mod user;

/// Rejected input; nothing was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty or whitespace-only.
    MissingField(&'static str),
    /// Another user already holds this username.
    DuplicateUsername(String),
    /// New users must be created with a password.
    PasswordRequired,
    /// Actor may not assign records to this company.
    CompanyNotPermitted(String),
    /// Removing this user would leave no administrator.
    LastAdmin,
    /// The active user tried to delete their own account.
    SelfDeletion,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::DuplicateUsername(username) => {
                write!(f, "username `{username}` is already taken")
            }
            Self::PasswordRequired => write!(f, "a password is required for new users"),
            Self::CompanyNotPermitted(company) => {
                write!(f, "not permitted to manage employees of company `{company}`")
            }
            Self::LastAdmin => write!(f, "the last administrator cannot be removed"),
            Self::SelfDeletion => write!(f, "the active user cannot delete their own account"),
        }
    }
}

impl Error for ValidationError {}

/// Returns the trimmed value, or `MissingField` when nothing remains.
pub(crate) fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Reads an explicit JSON `null` as the field's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
