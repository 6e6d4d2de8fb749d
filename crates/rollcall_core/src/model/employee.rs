//! Employee record.

use super::null_as_default;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment state; resigned employees accept no new attendance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Resigned,
}

/// Employee tracked for attendance.
///
/// Legacy records without `status` load as `Active`; a missing or `null`
/// phone loads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Organization-assigned reference number.
    pub ref_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Creates an active employee with a generated id.
    pub fn new(
        name: impl Into<String>,
        ref_id: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ref_id: ref_id.into(),
            phone: phone.into(),
            company: company.into(),
            status: EmployeeStatus::Active,
        }
    }

    pub fn is_resigned(&self) -> bool {
        self.status == EmployeeStatus::Resigned
    }

    /// Substring match over name, reference id, company and phone.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || self.name.contains(term)
            || self.ref_id.contains(term)
            || self.company.contains(term)
            || self.phone.contains(term)
    }
}
