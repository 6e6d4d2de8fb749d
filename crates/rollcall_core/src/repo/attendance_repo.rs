//! Attendance record persistence.

use super::{RepoResult, StoreRepository};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, DayState};
use crate::store::collection::{load_collection, save_collection};
use crate::store::{KeyValueStore, ATTENDANCE_KEY};
use chrono::NaiveDate;
use log::debug;

/// Repository interface for attendance records.
pub trait AttendanceRepository {
    /// All records in storage order.
    fn list_attendance(&self) -> RepoResult<Vec<AttendanceRecord>>;
    /// Records belonging to one employee, in storage order.
    fn list_employee_attendance(&self, employee_id: &str) -> RepoResult<Vec<AttendanceRecord>>;
    /// Current tri-state for one (employee, day).
    fn attendance_state(&self, employee_id: &str, date: NaiveDate) -> RepoResult<DayState>;
    /// Replaces the record for (employee, day); `None` clears the day.
    fn save_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: Option<AttendanceStatus>,
    ) -> RepoResult<()>;
    /// Removes every record of one employee and returns how many were removed.
    fn delete_employee_attendance(&self, employee_id: &str) -> RepoResult<usize>;
}

impl<S: KeyValueStore> AttendanceRepository for StoreRepository<S> {
    fn list_attendance(&self) -> RepoResult<Vec<AttendanceRecord>> {
        Ok(load_collection(&self.store, ATTENDANCE_KEY)?)
    }

    fn list_employee_attendance(&self, employee_id: &str) -> RepoResult<Vec<AttendanceRecord>> {
        let mut records = self.list_attendance()?;
        records.retain(|record| record.employee_id == employee_id);
        Ok(records)
    }

    fn attendance_state(&self, employee_id: &str, date: NaiveDate) -> RepoResult<DayState> {
        let status = self
            .list_attendance()?
            .into_iter()
            .find(|record| record.employee_id == employee_id && record.date == date)
            .map(|record| record.status);
        Ok(DayState::from(status))
    }

    fn save_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: Option<AttendanceStatus>,
    ) -> RepoResult<()> {
        let mut records = self.list_attendance()?;
        records.retain(|record| !(record.employee_id == employee_id && record.date == date));

        if let Some(status) = status {
            records.push(AttendanceRecord::new(employee_id, date, status));
        }

        save_collection(&self.store, ATTENDANCE_KEY, &records)?;
        debug!(
            "event=attendance_save module=repo status=ok employee_id={} date={} value={:?}",
            employee_id, date, status
        );
        Ok(())
    }

    fn delete_employee_attendance(&self, employee_id: &str) -> RepoResult<usize> {
        let mut records = self.list_attendance()?;
        let before = records.len();
        records.retain(|record| record.employee_id != employee_id);
        let removed = before - records.len();

        if removed > 0 {
            save_collection(&self.store, ATTENDANCE_KEY, &records)?;
        }
        Ok(removed)
    }
}
