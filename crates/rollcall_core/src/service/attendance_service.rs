//! Attendance state machine.
//!
//! # Responsibility
//! - Apply per-day toggles for one employee under session permissions.
//! - Emit an absence alert when a day newly becomes absent.
//!
//! # Invariants
//! - Requesting the held status clears the day; the other status overwrites.
//! - Read-only actors, hidden companies and resigned employees never change
//!   stored attendance.
//! - At most one alert per transition into `Absent`; none otherwise. A failed
//!   alert write is logged and never undoes the stored toggle.

use super::notification_log::NotificationLog;
use super::{ServiceError, ServiceResult};
use crate::auth::session::Session;
use crate::clock::Clock;
use crate::model::attendance::{AttendanceStatus, DayState};
use crate::model::notification::{Notification, NotificationKind};
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::store::KeyValueStore;
use chrono::NaiveDate;
use log::{info, warn};

pub const ABSENCE_ALERT_TITLE: &str = "Absence alert";

/// Why a toggle was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session, or the session lacks edit rights.
    ReadOnly,
    /// The employee belongs to a company the session cannot view.
    CompanyNotVisible,
    /// Resigned employees accept no new attendance.
    EmployeeResigned,
}

/// Result of a toggle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Changed {
        previous: DayState,
        current: DayState,
        /// Present when the day newly became absent.
        alert: Option<Notification>,
    },
    /// Nothing was written.
    Denied(DenialReason),
}

/// Use-case service for attendance marking.
pub struct AttendanceService<'a, R, S, C> {
    repo: &'a R,
    notifications: &'a NotificationLog<S, C>,
}

impl<'a, R, S, C> AttendanceService<'a, R, S, C>
where
    R: EmployeeRepository + AttendanceRepository,
    S: KeyValueStore,
    C: Clock,
{
    pub fn new(repo: &'a R, notifications: &'a NotificationLog<S, C>) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    /// Current tri-state for one (employee, day).
    pub fn day_state(&self, employee_id: &str, date: NaiveDate) -> ServiceResult<DayState> {
        Ok(self.repo.attendance_state(employee_id, date)?)
    }

    /// Applies a click on `requested` for (employee, day).
    ///
    /// # Errors
    /// - `EmployeeNotFound` when no employee has `employee_id`.
    pub fn toggle(
        &self,
        session: &Session,
        employee_id: &str,
        date: NaiveDate,
        requested: AttendanceStatus,
    ) -> ServiceResult<ToggleOutcome> {
        if !session.can_edit() {
            return Ok(deny(employee_id, DenialReason::ReadOnly));
        }

        let employee = self
            .repo
            .get_employee(employee_id)?
            .ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))?;

        if !session.can_view_company(&employee.company) {
            return Ok(deny(employee_id, DenialReason::CompanyNotVisible));
        }
        if employee.is_resigned() {
            return Ok(deny(employee_id, DenialReason::EmployeeResigned));
        }

        let previous = self.repo.attendance_state(employee_id, date)?;
        let current = previous.toggle(requested);
        self.repo
            .save_attendance(employee_id, date, current.status())?;

        let alert = if current == DayState::Absent && previous != DayState::Absent {
            self.raise_absence_alert(employee_id, &employee.name, date)
        } else {
            None
        };

        info!(
            "event=attendance_toggle module=service status=ok employee_id={} date={} from={:?} to={:?}",
            employee_id, date, previous, current
        );
        Ok(ToggleOutcome::Changed {
            previous,
            current,
            alert,
        })
    }
}

impl<R, S, C> AttendanceService<'_, R, S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// The toggle is already stored, so a failed feed write only loses the
    /// alert.
    fn raise_absence_alert(
        &self,
        employee_id: &str,
        name: &str,
        date: NaiveDate,
    ) -> Option<Notification> {
        let message = format!("{name} was marked absent on {}.", date.format("%Y-%m-%d"));
        match self
            .notifications
            .add(ABSENCE_ALERT_TITLE, message, NotificationKind::Alert)
        {
            Ok(notification) => Some(notification),
            Err(err) => {
                warn!(
                    "event=absence_alert module=service status=error employee_id={} error={}",
                    employee_id, err
                );
                None
            }
        }
    }
}

fn deny(employee_id: &str, reason: DenialReason) -> ToggleOutcome {
    info!(
        "event=attendance_toggle module=service status=denied employee_id={} reason={:?}",
        employee_id, reason
    );
    ToggleOutcome::Denied(reason)
}
