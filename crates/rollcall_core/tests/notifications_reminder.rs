use chrono::NaiveDate;
use rollcall_core::service::reminder::REMINDER_TITLE;
use rollcall_core::{
    run_daily_reminder, AllowedCompanies, AttendanceRepository, AttendanceStatus, Employee,
    EmployeeRepository, FixedClock, KeyValueStore, MemoryStore, NotificationKind,
    NotificationLog, Permissions, ReminderOutcome, ReminderPolicy, Role, Session,
    StoreRepository, User,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
}

fn clock_at(millis: i64) -> FixedClock {
    FixedClock::new(today(), millis)
}

fn viewer(companies: &[&str]) -> Session {
    Session::for_user(User {
        id: "viewer".to_string(),
        username: "viewer".to_string(),
        password_hash: String::new(),
        display_name: "Viewer".to_string(),
        role: Role::User,
        permissions: Permissions::read_only(AllowedCompanies::from_names(
            companies.iter().copied(),
        )),
    })
}

fn seed_employees(repo: &StoreRepository<&MemoryStore>, company: &str, count: usize) -> Vec<Employee> {
    (0..count)
        .map(|index| {
            let employee = Employee::new(format!("E{index}"), format!("R{index}"), "", company);
            repo.save_employee(&employee).unwrap();
            employee
        })
        .collect()
}

#[test]
fn feed_is_newest_first_and_tracks_read_state() {
    let store = MemoryStore::new();
    let log = NotificationLog::new(&store, clock_at(1_000));

    let first = log.add("First", "one", NotificationKind::Info).unwrap();
    let second = log.add("Second", "two", NotificationKind::Warning).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.timestamp, 1_000);
    assert!(!first.is_read);

    let feed = log.list().unwrap();
    assert_eq!(feed[0].id, second.id);
    assert_eq!(feed[1].id, first.id);
    assert_eq!(log.unread_count().unwrap(), 2);

    assert!(log.mark_as_read(&first.id).unwrap());
    assert!(!log.mark_as_read("missing").unwrap());
    assert_eq!(log.unread_count().unwrap(), 1);
    assert_eq!(log.list().unwrap().len(), 2);

    assert_eq!(log.mark_all_as_read().unwrap(), 1);
    assert_eq!(log.mark_all_as_read().unwrap(), 0);
    assert_eq!(log.unread_count().unwrap(), 0);

    log.clear().unwrap();
    assert!(log.list().unwrap().is_empty());
}

#[test]
fn feed_uses_stored_wire_shape() {
    let store = MemoryStore::new();
    let log = NotificationLog::new(&store, clock_at(42));
    log.add("T", "M", NotificationKind::Alert).unwrap();

    let raw = store.get("app_notifications").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["type"], "alert");
    assert_eq!(json[0]["isRead"], false);
    assert_eq!(json[0]["timestamp"], 42);
}

#[test]
fn reminder_fires_once_per_day_when_coverage_is_low() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock_at(5));
    let policy = ReminderPolicy::default();
    let session = viewer(&["Acme"]);
    seed_employees(&repo, "Acme", 10);

    let outcome = run_daily_reminder(&policy, &session, &repo, &store, &log).unwrap();
    let ReminderOutcome::Emitted(notification) = outcome else {
        panic!("low coverage must emit a reminder");
    };
    assert_eq!(notification.title, REMINDER_TITLE);
    assert_eq!(notification.kind, NotificationKind::Info);
    assert!(notification.message.contains("2024-09-16"));
    assert_eq!(
        store.get("last_attendance_reminder_2024-09-16").unwrap().as_deref(),
        Some("true")
    );

    let again = run_daily_reminder(&policy, &session, &repo, &store, &log).unwrap();
    assert_eq!(again, ReminderOutcome::AlreadyShown);
    assert_eq!(log.list().unwrap().len(), 1);
}

#[test]
fn reminder_respects_threshold_over_visible_employees() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock_at(5));
    let policy = ReminderPolicy::default();
    let acme = seed_employees(&repo, "Acme", 5);
    let beta = seed_employees(&repo, "Beta", 5);

    // Records for hidden employees do not count toward coverage.
    for employee in &beta {
        repo.save_attendance(&employee.id, today(), Some(AttendanceStatus::Present))
            .unwrap();
    }
    let session = viewer(&["Acme"]);
    repo.save_attendance(&acme[0].id, today(), Some(AttendanceStatus::Absent))
        .unwrap();

    // 1 of 5 visible recorded: 1 >= 5 * 0.2, so no reminder.
    let outcome = run_daily_reminder(&policy, &session, &repo, &store, &log).unwrap();
    assert_eq!(
        outcome,
        ReminderOutcome::CoverageSufficient {
            recorded: 1,
            visible: 5
        }
    );
    assert!(log.list().unwrap().is_empty());

    let strict = ReminderPolicy {
        threshold_ratio: 0.5,
        ..ReminderPolicy::default()
    };
    let outcome = run_daily_reminder(&strict, &session, &repo, &store, &log).unwrap();
    assert!(matches!(outcome, ReminderOutcome::Emitted(_)));
}

#[test]
fn reminder_skips_without_session_employees_or_when_disabled() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock_at(5));
    let policy = ReminderPolicy::default();
    let session = viewer(&["*"]);

    assert_eq!(
        run_daily_reminder(&policy, &session, &repo, &store, &log).unwrap(),
        ReminderOutcome::NoEmployees
    );

    seed_employees(&repo, "Acme", 3);
    assert_eq!(
        run_daily_reminder(&policy, &Session::anonymous(), &repo, &store, &log).unwrap(),
        ReminderOutcome::NoSession
    );

    let disabled = ReminderPolicy {
        enabled: false,
        ..ReminderPolicy::default()
    };
    assert_eq!(
        run_daily_reminder(&disabled, &session, &repo, &store, &log).unwrap(),
        ReminderOutcome::Disabled
    );
    assert!(log.list().unwrap().is_empty());
    assert_eq!(store.get("last_attendance_reminder_2024-09-16").unwrap(), None);
}

#[test]
fn out_of_range_ratios_are_clamped_before_use() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let log = NotificationLog::new(&store, clock_at(5));
    let session = viewer(&["Acme"]);
    let acme = seed_employees(&repo, "Acme", 5);
    repo.save_attendance(&acme[0].id, today(), Some(AttendanceStatus::Present))
        .unwrap();

    let not_a_number = ReminderPolicy {
        threshold_ratio: f64::NAN,
        ..ReminderPolicy::default()
    };
    assert_eq!(not_a_number.effective_ratio(), 0.2);
    assert_eq!(
        run_daily_reminder(&not_a_number, &session, &repo, &store, &log).unwrap(),
        ReminderOutcome::CoverageSufficient {
            recorded: 1,
            visible: 5
        }
    );

    let negative = ReminderPolicy {
        threshold_ratio: -3.0,
        ..ReminderPolicy::default()
    };
    assert_eq!(negative.effective_ratio(), 0.0);
    assert!(matches!(
        run_daily_reminder(&negative, &session, &repo, &store, &log).unwrap(),
        ReminderOutcome::CoverageSufficient { .. }
    ));
    assert!(log.list().unwrap().is_empty());

    let oversized = ReminderPolicy {
        threshold_ratio: 7.5,
        ..ReminderPolicy::default()
    };
    assert_eq!(oversized.effective_ratio(), 1.0);
}
