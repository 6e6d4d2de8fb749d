//! Once-per-day attendance reminder.
//!
//! # Invariants
//! - At most one reminder per calendar day, gated by the day's marker key.
//! - The marker is written only together with the reminder it records.

use super::notification_log::NotificationLog;
use super::ServiceResult;
use crate::auth::session::Session;
use crate::clock::Clock;
use crate::model::notification::{Notification, NotificationKind};
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::store::{reminder_marker_key, KeyValueStore};
use log::info;
use serde::Deserialize;
use std::collections::HashSet;

pub const REMINDER_TITLE: &str = "Attendance reminder";

/// Tunable reminder rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReminderPolicy {
    pub enabled: bool,
    /// Remind while fewer than this share of visible employees have a
    /// record for today. Must lie within `0.0..=1.0`.
    pub threshold_ratio: f64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ratio: 0.2,
        }
    }
}

impl ReminderPolicy {
    /// Ratio actually applied: clamped into `0.0..=1.0`, with NaN falling
    /// back to the default.
    pub fn effective_ratio(&self) -> f64 {
        if self.threshold_ratio.is_nan() {
            Self::default().threshold_ratio
        } else {
            self.threshold_ratio.clamp(0.0, 1.0)
        }
    }
}

/// What a reminder check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    Emitted(Notification),
    AlreadyShown,
    CoverageSufficient { recorded: usize, visible: usize },
    NoEmployees,
    NoSession,
    Disabled,
}

/// Runs the daily reminder check for the clock's current day.
///
/// `markers` holds the per-day marker keys; usually the repository's store.
pub fn run_daily_reminder<R, M, S, C>(
    policy: &ReminderPolicy,
    session: &Session,
    repo: &R,
    markers: &M,
    notifications: &NotificationLog<S, C>,
) -> ServiceResult<ReminderOutcome>
where
    R: EmployeeRepository + AttendanceRepository,
    M: KeyValueStore + ?Sized,
    S: KeyValueStore,
    C: Clock,
{
    if !policy.enabled {
        return Ok(ReminderOutcome::Disabled);
    }
    if !session.is_authenticated() {
        return Ok(ReminderOutcome::NoSession);
    }

    let today = notifications.clock().today();
    let marker_key = reminder_marker_key(today);
    if markers.get(&marker_key)?.is_some() {
        return Ok(ReminderOutcome::AlreadyShown);
    }

    let employees = repo.list_employees()?;
    if employees.is_empty() {
        return Ok(ReminderOutcome::NoEmployees);
    }

    let recorded_today: HashSet<String> = repo
        .list_attendance()?
        .into_iter()
        .filter(|record| record.date == today)
        .map(|record| record.employee_id)
        .collect();
    let visible: Vec<_> = employees
        .iter()
        .filter(|employee| session.can_view_company(&employee.company))
        .collect();
    let recorded = visible
        .iter()
        .filter(|employee| recorded_today.contains(&employee.id))
        .count();

    if recorded as f64 >= visible.len() as f64 * policy.effective_ratio() {
        return Ok(ReminderOutcome::CoverageSufficient {
            recorded,
            visible: visible.len(),
        });
    }

    let day = today.format("%Y-%m-%d");
    let notification = notifications.add(
        REMINDER_TITLE,
        format!("Attendance for today ({day}) has not been recorded for most employees. Please update the records."),
        NotificationKind::Info,
    )?;
    markers.set(&marker_key, "true")?;
    info!(
        "event=attendance_reminder module=service status=emitted day={} recorded={} visible={}",
        day,
        recorded,
        visible.len()
    );
    Ok(ReminderOutcome::Emitted(notification))
}
