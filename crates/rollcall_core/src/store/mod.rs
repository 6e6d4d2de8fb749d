//! Key-value store adapters and typed collection helpers.
//!
//! # Responsibility
//! - Define the minimal get/set/remove contract every backend satisfies.
//! - Name the keys under which collections and markers are persisted.
//! - Decode/encode whole JSON collections for the repository layer.
//!
//! # Invariants
//! - Values are JSON text; the store never interprets them.
//! - A write is visible to the next read through the same store.
//! - Unparseable collection payloads read as empty, never as an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod memory;
pub mod sqlite;

/// Collection of persisted users.
pub const USERS_KEY: &str = "app_users";
/// Collection of persisted employees.
pub const EMPLOYEES_KEY: &str = "app_employees";
/// Collection of persisted attendance records.
pub const ATTENDANCE_KEY: &str = "app_attendance";
/// Notification feed, newest first.
pub const NOTIFICATIONS_KEY: &str = "app_notifications";
/// Pointer to the user id of the active session.
pub const ACTIVE_USER_KEY: &str = "active_user_id";

const REMINDER_MARKER_PREFIX: &str = "last_attendance_reminder_";

/// Returns the per-day marker key recording that the reminder was shown.
pub fn reminder_marker_key(day: chrono::NaiveDate) -> String {
    format!("{REMINDER_MARKER_PREFIX}{}", day.format("%Y-%m-%d"))
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a store backend or by collection encoding.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The store file was written by a newer schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite store failure: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Minimal persistence contract shared by all backends.
pub trait KeyValueStore {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
