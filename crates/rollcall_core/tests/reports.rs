use chrono::NaiveDate;
use rollcall_core::{
    AllowedCompanies, AttendanceReport, AttendanceRepository, AttendanceStatus, Employee,
    EmployeeRepository, MemoryStore, Permissions, ReportQuery, ReportScope, Role, Session,
    StoreRepository, User,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn viewer(role: Role, companies: &[&str]) -> Session {
    Session::for_user(User {
        id: "viewer".to_string(),
        username: "viewer".to_string(),
        password_hash: String::new(),
        display_name: "Viewer".to_string(),
        role,
        permissions: Permissions::read_only(AllowedCompanies::from_names(
            companies.iter().copied(),
        )),
    })
}

struct Fixture {
    ada: Employee,
    bo: Employee,
    cy: Employee,
}

fn seed(repo: &StoreRepository<&MemoryStore>) -> Fixture {
    let ada = Employee::new("Ada", "R-1", "", "Acme");
    let bo = Employee::new("Bo", "R-2", "", "Beta");
    let cy = Employee::new("Cy Ada", "R-3", "", "Acme");
    for employee in [&ada, &bo, &cy] {
        repo.save_employee(employee).unwrap();
    }

    repo.save_attendance(&ada.id, day(3), Some(AttendanceStatus::Absent))
        .unwrap();
    repo.save_attendance(&ada.id, day(1), Some(AttendanceStatus::Present))
        .unwrap();
    repo.save_attendance(&ada.id, day(2), Some(AttendanceStatus::Present))
        .unwrap();
    repo.save_attendance(&bo.id, day(1), Some(AttendanceStatus::Absent))
        .unwrap();
    Fixture { ada, bo, cy }
}

#[test]
fn report_counts_and_sorts_per_employee() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let fx = seed(&repo);
    let admin = viewer(Role::Admin, &[]);

    let report = AttendanceReport::build(&admin, &repo, &ReportQuery::default(), day(28)).unwrap();
    assert_eq!(report.scope, ReportScope::AllCompanies);
    assert!(!report.individual);
    assert_eq!(report.generated_on, day(28));
    assert_eq!(report.entries.len(), 3);

    let ada = &report.entries[0];
    assert_eq!(ada.employee.id, fx.ada.id);
    assert_eq!((ada.present, ada.absent), (2, 1));
    let dates: Vec<_> = ada.records.iter().map(|record| record.date).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3)]);

    assert_eq!(report.entries[2].employee.id, fx.cy.id);
    assert!(report.entries[2].records.is_empty());
    assert_eq!(report.totals(), (2, 2));
}

#[test]
fn report_only_includes_visible_employees() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let fx = seed(&repo);

    let clerk = viewer(Role::User, &["Acme"]);
    let report = AttendanceReport::build(&clerk, &repo, &ReportQuery::default(), day(28)).unwrap();
    assert!(report.entries.iter().all(|entry| entry.employee.id != fx.bo.id));
    assert_eq!(report.entries.len(), 2);

    let nobody = AttendanceReport::build(
        &Session::anonymous(),
        &repo,
        &ReportQuery::default(),
        day(28),
    )
    .unwrap();
    assert!(nobody.is_empty());
}

#[test]
fn report_filters_combine() {
    let store = MemoryStore::new();
    let repo = StoreRepository::new(&store);
    let fx = seed(&repo);
    let admin = viewer(Role::Admin, &[]);

    let by_company = ReportQuery {
        company: Some("Acme".to_string()),
        name_contains: Some("Ada".to_string()),
        ..ReportQuery::default()
    };
    let report = AttendanceReport::build(&admin, &repo, &by_company, day(28)).unwrap();
    assert_eq!(report.scope, ReportScope::Company("Acme".to_string()));
    let ids: Vec<_> = report.entries.iter().map(|entry| entry.employee.id.clone()).collect();
    assert_eq!(ids, vec![fx.ada.id.clone(), fx.cy.id.clone()]);

    let individual = ReportQuery {
        employee_id: Some(fx.bo.id.clone()),
        ..ReportQuery::default()
    };
    let report = AttendanceReport::build(&admin, &repo, &individual, day(28)).unwrap();
    assert!(report.individual);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].absent, 1);
}
