//! Attendance report data for printable summaries.
//!
//! Only employees visible to the session appear in a report. Rendering is
//! left to the caller.

use super::ServiceResult;
use crate::auth::session::Session;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::employee_repo::EmployeeRepository;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Optional report filters; all set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub company: Option<String>,
    pub employee_id: Option<String>,
    /// Substring of the employee name.
    pub name_contains: Option<String>,
}

impl ReportQuery {
    fn matches(&self, employee: &Employee) -> bool {
        self.company
            .as_deref()
            .map_or(true, |company| employee.company == company)
            && self
                .employee_id
                .as_deref()
                .map_or(true, |id| employee.id == id)
            && self
                .name_contains
                .as_deref()
                .map_or(true, |name| employee.name.contains(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    AllCompanies,
    Company(String),
}

/// Per-employee section of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReport {
    pub employee: Employee,
    pub present: usize,
    pub absent: usize,
    /// Sorted by date ascending.
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReport {
    pub scope: ReportScope,
    /// A single employee was selected.
    pub individual: bool,
    pub generated_on: NaiveDate,
    pub entries: Vec<EmployeeReport>,
}

impl AttendanceReport {
    /// Builds the report for employees visible to `session` and matching
    /// `query`, in employee storage order.
    pub fn build<R>(
        session: &Session,
        repo: &R,
        query: &ReportQuery,
        generated_on: NaiveDate,
    ) -> ServiceResult<Self>
    where
        R: EmployeeRepository + AttendanceRepository,
    {
        let mut by_employee: HashMap<String, Vec<AttendanceRecord>> = HashMap::new();
        for record in repo.list_attendance()? {
            by_employee
                .entry(record.employee_id.clone())
                .or_default()
                .push(record);
        }

        let entries = repo
            .list_employees()?
            .into_iter()
            .filter(|employee| session.can_view_company(&employee.company))
            .filter(|employee| query.matches(employee))
            .map(|employee| {
                let mut records = by_employee.remove(&employee.id).unwrap_or_default();
                records.sort_by_key(|record| record.date);
                let present = count(&records, AttendanceStatus::Present);
                let absent = count(&records, AttendanceStatus::Absent);
                EmployeeReport {
                    employee,
                    present,
                    absent,
                    records,
                }
            })
            .collect();

        Ok(Self {
            scope: query
                .company
                .clone()
                .map_or(ReportScope::AllCompanies, ReportScope::Company),
            individual: query.employee_id.is_some(),
            generated_on,
            entries,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sums of present and absent days across all entries.
    pub fn totals(&self) -> (usize, usize) {
        self.entries.iter().fold((0, 0), |(present, absent), entry| {
            (present + entry.present, absent + entry.absent)
        })
    }
}

fn count(records: &[AttendanceRecord], status: AttendanceStatus) -> usize {
    records
        .iter()
        .filter(|record| record.status == status)
        .count()
}
