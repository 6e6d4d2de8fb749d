//! Attendance records and the per-day tri-state.
//!
//! # Invariants
//! - Record id is always `<employee_id>_<YYYY-MM-DD>`.
//! - A day without a record is `DayState::Unset`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status stored in an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One employee's status on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        let employee_id = employee_id.into();
        Self {
            id: record_id(&employee_id, date),
            employee_id,
            date,
            status,
        }
    }
}

/// Deterministic record id for an (employee, day) pair.
pub fn record_id(employee_id: &str, date: NaiveDate) -> String {
    format!("{employee_id}_{}", date.format("%Y-%m-%d"))
}

/// Exactly one of these holds for every (employee, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayState {
    Unset,
    Present,
    Absent,
}

impl DayState {
    /// Stored status for this state; `None` means no record.
    pub fn status(self) -> Option<AttendanceStatus> {
        match self {
            Self::Unset => None,
            Self::Present => Some(AttendanceStatus::Present),
            Self::Absent => Some(AttendanceStatus::Absent),
        }
    }

    /// Next state when `requested` is clicked.
    ///
    /// Requesting the held status clears the day; requesting the other status
    /// overwrites it.
    pub fn toggle(self, requested: AttendanceStatus) -> Self {
        let requested = Self::from(requested);
        if self == requested {
            Self::Unset
        } else {
            requested
        }
    }
}

impl From<AttendanceStatus> for DayState {
    fn from(value: AttendanceStatus) -> Self {
        match value {
            AttendanceStatus::Present => Self::Present,
            AttendanceStatus::Absent => Self::Absent,
        }
    }
}

impl From<Option<AttendanceStatus>> for DayState {
    fn from(value: Option<AttendanceStatus>) -> Self {
        value.map_or(Self::Unset, Self::from)
    }
}
