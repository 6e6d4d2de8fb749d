//! Employee persistence with cascading attendance cleanup.

use super::attendance_repo::AttendanceRepository;
use super::{RepoResult, StoreRepository};
use crate::model::employee::Employee;
use crate::store::collection::{load_collection, save_collection};
use crate::store::{KeyValueStore, EMPLOYEES_KEY};
use log::info;

/// Repository interface for employees.
pub trait EmployeeRepository {
    /// All employees; legacy records are normalized to `Active`.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn get_employee(&self, id: &str) -> RepoResult<Option<Employee>>;
    /// Upserts by id; new employees are appended.
    fn save_employee(&self, employee: &Employee) -> RepoResult<()>;
    /// Deletes the employee and all its attendance records.
    ///
    /// Returns `false` when no employee had this id.
    fn delete_employee(&self, id: &str) -> RepoResult<bool>;
}

impl<S: KeyValueStore> EmployeeRepository for StoreRepository<S> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        Ok(load_collection(&self.store, EMPLOYEES_KEY)?)
    }

    fn get_employee(&self, id: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .list_employees()?
            .into_iter()
            .find(|employee| employee.id == id))
    }

    fn save_employee(&self, employee: &Employee) -> RepoResult<()> {
        let mut employees = self.list_employees()?;
        match employees.iter_mut().find(|existing| existing.id == employee.id) {
            Some(existing) => *existing = employee.clone(),
            None => employees.push(employee.clone()),
        }
        save_collection(&self.store, EMPLOYEES_KEY, &employees)?;
        Ok(())
    }

    fn delete_employee(&self, id: &str) -> RepoResult<bool> {
        let mut employees = self.list_employees()?;
        let before = employees.len();
        employees.retain(|employee| employee.id != id);
        let existed = employees.len() != before;

        if existed {
            save_collection(&self.store, EMPLOYEES_KEY, &employees)?;
        }
        // Also clears records left under an id with no employee.
        let removed_records = self.delete_employee_attendance(id)?;

        info!(
            "event=employee_delete module=repo status=ok employee_id={} existed={} removed_records={}",
            id, existed, removed_records
        );
        Ok(existed)
    }
}
