//! Employee management use-cases.
//!
//! # Invariants
//! - Every mutation requires edit rights and visibility of the company
//!   involved.
//! - Updates never change employment status; `set_status` does.

use super::{ServiceError, ServiceResult};
use crate::auth::session::Session;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::{require, ValidationError};
use crate::repo::employee_repo::EmployeeRepository;
use log::info;
use std::collections::BTreeSet;

/// Editable employee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeInput {
    pub name: String,
    pub ref_id: String,
    pub phone: String,
    pub company: String,
}

impl EmployeeInput {
    pub fn new(
        name: impl Into<String>,
        ref_id: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ref_id: ref_id.into(),
            phone: phone.into(),
            company: company.into(),
        }
    }

    /// Trims fields and rejects missing name, reference id or company.
    fn validated(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require("name", &self.name)?,
            ref_id: require("refId", &self.ref_id)?,
            phone: self.phone.trim().to_string(),
            company: require("company", &self.company)?,
        })
    }
}

/// Use-case service for employee records.
pub struct EmployeeService<'a, R> {
    repo: &'a R,
}

impl<'a, R: EmployeeRepository> EmployeeService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Employees whose company the session may view, in storage order.
    pub fn list_visible(&self, session: &Session) -> ServiceResult<Vec<Employee>> {
        let mut employees = self.repo.list_employees()?;
        employees.retain(|employee| session.can_view_company(&employee.company));
        Ok(employees)
    }

    /// Visible employees matching `term` in name, reference id, company or
    /// phone.
    pub fn search(&self, session: &Session, term: &str) -> ServiceResult<Vec<Employee>> {
        let mut employees = self.list_visible(session)?;
        employees.retain(|employee| employee.matches(term));
        Ok(employees)
    }

    /// Distinct companies among visible employees, sorted.
    pub fn visible_companies(&self, session: &Session) -> ServiceResult<Vec<String>> {
        let companies: BTreeSet<String> = self
            .list_visible(session)?
            .into_iter()
            .map(|employee| employee.company)
            .collect();
        Ok(companies.into_iter().collect())
    }

    /// Creates an active employee.
    pub fn create(&self, session: &Session, input: &EmployeeInput) -> ServiceResult<Employee> {
        require_edit(session)?;
        let input = input.validated()?;
        require_company(session, &input.company)?;

        let employee = Employee::new(input.name, input.ref_id, input.phone, input.company);
        self.repo.save_employee(&employee)?;
        info!(
            "event=employee_create module=service status=ok employee_id={}",
            employee.id
        );
        Ok(employee)
    }

    /// Replaces the editable fields of an existing employee.
    pub fn update(
        &self,
        session: &Session,
        id: &str,
        input: &EmployeeInput,
    ) -> ServiceResult<Employee> {
        require_edit(session)?;
        let input = input.validated()?;
        let existing = self.visible_employee(session, id)?;
        require_company(session, &input.company)?;

        let employee = Employee {
            id: existing.id,
            name: input.name,
            ref_id: input.ref_id,
            phone: input.phone,
            company: input.company,
            status: existing.status,
        };
        self.repo.save_employee(&employee)?;
        Ok(employee)
    }

    /// Resigns or reactivates an employee. History is kept either way.
    pub fn set_status(
        &self,
        session: &Session,
        id: &str,
        status: EmployeeStatus,
    ) -> ServiceResult<Employee> {
        require_edit(session)?;
        let mut employee = self.visible_employee(session, id)?;
        employee.status = status;
        self.repo.save_employee(&employee)?;
        info!(
            "event=employee_status module=service status=ok employee_id={} value={:?}",
            employee.id, employee.status
        );
        Ok(employee)
    }

    /// Deletes an employee together with its attendance history.
    pub fn delete(&self, session: &Session, id: &str) -> ServiceResult<()> {
        require_edit(session)?;
        self.visible_employee(session, id)?;
        self.repo.delete_employee(id)?;
        Ok(())
    }

    /// Looks up an employee the session may operate on.
    ///
    /// Hidden employees are reported as not found.
    fn visible_employee(&self, session: &Session, id: &str) -> ServiceResult<Employee> {
        self.repo
            .get_employee(id)?
            .filter(|employee| session.can_view_company(&employee.company))
            .ok_or_else(|| ServiceError::EmployeeNotFound(id.to_string()))
    }
}

fn require_edit(session: &Session) -> ServiceResult<()> {
    if session.can_edit() {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied("editing employees"))
    }
}

fn require_company(session: &Session, company: &str) -> ServiceResult<()> {
    if session.can_view_company(company) {
        Ok(())
    } else {
        Err(ValidationError::CompanyNotPermitted(company.to_string()).into())
    }
}
