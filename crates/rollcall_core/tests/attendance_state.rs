use chrono::NaiveDate;
use rollcall_core::{
    AllowedCompanies, AttendanceRepository, AttendanceService, AttendanceStatus, DayState,
    DenialReason, Employee, EmployeeRepository, EmployeeStatus, FixedClock, MemoryStore,
    NotificationKind, NotificationLog, Permissions, Role, ServiceError, Session, StoreRepository,
    ToggleOutcome, User,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(day(10), 1_718_000_000_000)
}

fn session(role: Role, can_edit: bool, companies: &[&str]) -> Session {
    Session::for_user(User {
        id: "actor".to_string(),
        username: "actor".to_string(),
        password_hash: String::new(),
        display_name: "Actor".to_string(),
        role,
        permissions: Permissions {
            can_edit,
            allowed_companies: AllowedCompanies::from_names(companies.iter().copied()),
        },
    })
}

fn editor() -> Session {
    session(Role::User, true, &["Acme"])
}

#[test]
fn repeated_saves_keep_one_record_per_day() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);

    repo.save_attendance("e1", day(1), Some(AttendanceStatus::Present))
        .unwrap();
    repo.save_attendance("e1", day(1), Some(AttendanceStatus::Absent))
        .unwrap();
    repo.save_attendance("e1", day(1), Some(AttendanceStatus::Absent))
        .unwrap();
    repo.save_attendance("e1", day(2), Some(AttendanceStatus::Present))
        .unwrap();

    let records = repo.list_employee_attendance("e1").unwrap();
    assert_eq!(records.len(), 2);
    let first = records.iter().find(|record| record.date == day(1)).unwrap();
    assert_eq!(first.id, "e1_2024-06-01");
    assert_eq!(first.status, AttendanceStatus::Absent);

    repo.save_attendance("e1", day(1), None).unwrap();
    assert_eq!(repo.attendance_state("e1", day(1)).unwrap(), DayState::Unset);
    assert_eq!(repo.list_attendance().unwrap().len(), 1);
}

#[test]
fn deleting_employee_cascades_to_attendance() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let keep = Employee::new("Keep", "R-1", "", "Acme");
    let gone = Employee::new("Gone", "R-2", "", "Acme");
    repo.save_employee(&keep).unwrap();
    repo.save_employee(&gone).unwrap();
    for d in 1..=3 {
        repo.save_attendance(&gone.id, day(d), Some(AttendanceStatus::Present))
            .unwrap();
    }
    repo.save_attendance(&keep.id, day(1), Some(AttendanceStatus::Absent))
        .unwrap();

    assert!(repo.delete_employee(&gone.id).unwrap());

    assert!(repo.get_employee(&gone.id).unwrap().is_none());
    assert!(repo
        .list_attendance()
        .unwrap()
        .iter()
        .all(|record| record.employee_id != gone.id));
    assert_eq!(repo.list_employee_attendance(&keep.id).unwrap().len(), 1);
    assert!(!repo.delete_employee(&gone.id).unwrap());
}

#[test]
fn legacy_employee_without_status_loads_active() {
    let store = MemoryStore::new();
    rollcall_core::KeyValueStore::set(
        &store,
        "app_employees",
        r#"[{"id": "e1", "name": "Old", "refId": "7", "phone": "", "company": "Acme"}]"#,
    )
    .unwrap();
    let repo = StoreRepository::new(&store);

    let employees = repo.list_employees().unwrap();
    assert_eq!(employees[0].status, EmployeeStatus::Active);
}

#[test]
fn clicking_same_status_twice_returns_to_unset() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock());
    let service = AttendanceService::new(&repo, &log);
    let employee = Employee::new("Ada", "R-1", "", "Acme");
    repo.save_employee(&employee).unwrap();
    let actor = editor();

    let first = service
        .toggle(&actor, &employee.id, day(3), AttendanceStatus::Present)
        .unwrap();
    assert!(matches!(
        first,
        ToggleOutcome::Changed {
            previous: DayState::Unset,
            current: DayState::Present,
            alert: None
        }
    ));

    let second = service
        .toggle(&actor, &employee.id, day(3), AttendanceStatus::Present)
        .unwrap();
    assert!(matches!(
        second,
        ToggleOutcome::Changed {
            previous: DayState::Present,
            current: DayState::Unset,
            ..
        }
    ));
    assert_eq!(service.day_state(&employee.id, day(3)).unwrap(), DayState::Unset);
    assert!(repo.list_attendance().unwrap().is_empty());
}

#[test]
fn absence_alert_fires_only_on_entering_absent() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock());
    let service = AttendanceService::new(&repo, &log);
    let employee = Employee::new("Ada", "R-1", "", "Acme");
    repo.save_employee(&employee).unwrap();
    let actor = editor();

    // Unset -> Absent
    let outcome = service
        .toggle(&actor, &employee.id, day(4), AttendanceStatus::Absent)
        .unwrap();
    let ToggleOutcome::Changed { alert: Some(alert), .. } = outcome else {
        panic!("entering absent must raise an alert");
    };
    assert_eq!(alert.kind, NotificationKind::Alert);
    assert!(alert.message.contains("Ada"));
    assert!(alert.message.contains("2024-06-04"));
    assert_eq!(log.list().unwrap().len(), 1);

    // Absent -> Present
    service
        .toggle(&actor, &employee.id, day(4), AttendanceStatus::Present)
        .unwrap();
    assert_eq!(log.list().unwrap().len(), 1);

    // Present -> Absent
    service
        .toggle(&actor, &employee.id, day(4), AttendanceStatus::Absent)
        .unwrap();
    assert_eq!(log.list().unwrap().len(), 2);

    // Absent -> Unset
    service
        .toggle(&actor, &employee.id, day(4), AttendanceStatus::Absent)
        .unwrap();
    assert_eq!(log.list().unwrap().len(), 2);
    assert_eq!(service.day_state(&employee.id, day(4)).unwrap(), DayState::Unset);
}

#[test]
fn read_only_and_anonymous_sessions_are_denied() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock());
    let service = AttendanceService::new(&repo, &log);
    let employee = Employee::new("Ada", "R-1", "", "Acme");
    repo.save_employee(&employee).unwrap();

    for actor in [Session::anonymous(), session(Role::User, false, &["*"])] {
        let outcome = service
            .toggle(&actor, &employee.id, day(5), AttendanceStatus::Absent)
            .unwrap();
        assert_eq!(outcome, ToggleOutcome::Denied(DenialReason::ReadOnly));
    }
    assert!(repo.list_attendance().unwrap().is_empty());
    assert!(log.list().unwrap().is_empty());
}

#[test]
fn resigned_employee_is_frozen_even_for_admin() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock());
    let service = AttendanceService::new(&repo, &log);
    let mut employee = Employee::new("Ada", "R-1", "", "Acme");
    repo.save_employee(&employee).unwrap();
    repo.save_attendance(&employee.id, day(1), Some(AttendanceStatus::Present))
        .unwrap();
    employee.status = EmployeeStatus::Resigned;
    repo.save_employee(&employee).unwrap();

    let admin = session(Role::Admin, false, &[]);
    let outcome = service
        .toggle(&admin, &employee.id, day(2), AttendanceStatus::Present)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Denied(DenialReason::EmployeeResigned));

    let outcome = service
        .toggle(&admin, &employee.id, day(1), AttendanceStatus::Present)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Denied(DenialReason::EmployeeResigned));

    let history = repo.list_employee_attendance(&employee.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, AttendanceStatus::Present);
}

#[test]
fn hidden_company_is_denied_and_unknown_employee_errors() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock());
    let service = AttendanceService::new(&repo, &log);
    let employee = Employee::new("Bo", "R-9", "", "Beta");
    repo.save_employee(&employee).unwrap();

    let outcome = service
        .toggle(&editor(), &employee.id, day(6), AttendanceStatus::Present)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Denied(DenialReason::CompanyNotVisible));

    let err = service
        .toggle(&editor(), "missing", day(6), AttendanceStatus::Present)
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmployeeNotFound(ref id) if id == "missing"));
    assert!(repo.list_attendance().unwrap().is_empty());
}

/// Feed backend whose writes always fail.
struct ReadOnlyFeed;

impl rollcall_core::KeyValueStore for ReadOnlyFeed {
    fn get(&self, _key: &str) -> rollcall_core::StoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> rollcall_core::StoreResult<()> {
        Err(rollcall_core::StoreError::Sqlite(
            rusqlite::Error::InvalidQuery,
        ))
    }

    fn remove(&self, _key: &str) -> rollcall_core::StoreResult<()> {
        Ok(())
    }
}

#[test]
fn failed_alert_write_still_reports_stored_toggle() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let employee = Employee::new("Ada", "R-1", "", "Acme");
    repo.save_employee(&employee).unwrap();
    let log = NotificationLog::new(ReadOnlyFeed, clock());
    let service = AttendanceService::new(&repo, &log);

    let outcome = service
        .toggle(&editor(), &employee.id, day(3), AttendanceStatus::Absent)
        .unwrap();
    assert_eq!(
        outcome,
        ToggleOutcome::Changed {
            previous: DayState::Unset,
            current: DayState::Absent,
            alert: None,
        }
    );
    assert_eq!(
        repo.attendance_state(&employee.id, day(3)).unwrap(),
        DayState::Absent
    );
}
