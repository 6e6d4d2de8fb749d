//! Core domain logic for Rollcall, a local-first employee attendance tracker.
//! This crate is the single source of truth for access and attendance rules.

pub mod auth;
pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;
pub mod store;

pub use auth::session::Session;
pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{AttendanceRecord, AttendanceStatus, DayState};
pub use model::employee::{Employee, EmployeeStatus};
pub use model::notification::{Notification, NotificationKind};
pub use model::user::{AllowedCompanies, Permissions, Role, User, UserDraft};
pub use model::ValidationError;
pub use repo::attendance_repo::AttendanceRepository;
pub use repo::employee_repo::EmployeeRepository;
pub use repo::user_repo::UserRepository;
pub use repo::{RepoError, RepoResult, StoreRepository};
pub use service::attendance_service::{AttendanceService, DenialReason, ToggleOutcome};
pub use service::employee_service::{EmployeeInput, EmployeeService};
pub use service::notification_log::NotificationLog;
pub use service::reminder::{run_daily_reminder, ReminderOutcome, ReminderPolicy};
pub use service::report::{AttendanceReport, EmployeeReport, ReportQuery, ReportScope};
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};
pub use settings::{SettingsError, TrackerSettings};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteKvStore;
pub use store::{KeyValueStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
