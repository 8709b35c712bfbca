use tempfile::TempDir;
use workforce_core::{
    Account, Business, Client, ClientId, ConnectionProvider, DatabaseConfig, DatabasePool,
    Employee, Location, StoreError, TimeWindow, ValidationError, WorkLog, WorkforceService,
};

struct Fixture {
    _dir: TempDir,
    service: WorkforceService<DatabasePool>,
    client_id: ClientId,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let pool =
        DatabasePool::open(&DatabaseConfig::with_path(dir.path().join("work_logs.db"))).unwrap();
    let service = WorkforceService::new(pool);
    let owner = Employee::new(
        Account::new("ada", "acme", "hash", "ada@acme.test"),
        "Ada",
        "Lovelace",
        "owner",
    );
    service
        .create_business(&Business::new("acme", "Acme Ltd"), &owner)
        .unwrap();
    let client_id = service.create_client(&Client::new("Globex", "acme")).unwrap();
    Fixture {
        _dir: dir,
        service,
        client_id,
    }
}

fn location_counts(service: &WorkforceService<DatabasePool>) -> (i64, i64, i64) {
    let conn = service.provider().acquire().unwrap();
    let count = |table: &str| -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
    };
    (count("WorkLog"), count("Location"), count("LocationOwner"))
}

#[test]
fn work_log_with_location_round_trips_every_field() {
    let fx = fixture();
    let log = WorkLog::new("ada", "acme", fx.client_id, 1_000, 4_600, "boiler service")
        .with_location(Location::new("EC1A 1BB", "basement"));

    let id = fx.service.create_work_log(&log).unwrap();
    let loaded = fx.service.get_work_log(id).unwrap().unwrap();

    let expected = WorkLog {
        work_log_id: Some(id),
        ..log
    };
    assert_eq!(loaded, expected);
}

#[test]
fn work_log_without_location_still_gets_an_owner() {
    let fx = fixture();
    let log = WorkLog::new("ada", "acme", fx.client_id, 0, 10, "phone call");

    let id = fx.service.create_work_log(&log).unwrap();

    let loaded = fx.service.get_work_log(id).unwrap().unwrap();
    assert_eq!(loaded.location, None);
    let owner_id = fx.service.get_work_log_location_owner_id(id).unwrap().unwrap();
    assert!(fx.service.get_locations_for_owner(owner_id).unwrap().is_empty());
}

#[test]
fn inverted_time_range_is_rejected_without_touching_the_store() {
    let fx = fixture();
    let before = location_counts(&fx.service);

    for (start, end) in [(50, 50), (60, 50)] {
        let log = WorkLog::new("ada", "acme", fx.client_id, start, end, "bad")
            .with_location(Location::new("EC1A 1BB", "basement"));
        match fx.service.create_work_log(&log).unwrap_err() {
            StoreError::Validation(ValidationError::InvalidTimeRange {
                start_time,
                end_time,
            }) => {
                assert_eq!((start_time, end_time), (start, end));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(location_counts(&fx.service), before);
}

#[test]
fn unknown_employee_is_bad_key_and_leaves_no_rows() {
    let fx = fixture();
    let before = location_counts(&fx.service);
    let log = WorkLog::new("ghost", "acme", fx.client_id, 0, 10, "who")
        .with_location(Location::new("EC1A 1BB", "basement"));

    let err = fx.service.create_work_log(&log).unwrap_err();

    assert!(err.is_bad_key());
    assert_eq!(location_counts(&fx.service), before);
}

#[test]
fn unknown_work_log_reads_as_none() {
    let fx = fixture();
    assert_eq!(fx.service.get_work_log(99).unwrap(), None);
    assert_eq!(fx.service.get_work_log_location_owner_id(99).unwrap(), None);
}

#[test]
fn employee_logs_are_filtered_to_the_window_and_ordered() {
    let fx = fixture();
    for (start, end) in [(300, 400), (100, 200), (150, 350), (500, 600)] {
        fx.service
            .create_work_log(&WorkLog::new("ada", "acme", fx.client_id, start, end, "job"))
            .unwrap();
    }

    let window = TimeWindow::new(100, 400).unwrap();
    let starts: Vec<_> = fx
        .service
        .get_all_work_logs_for_employee("ada", "acme", window)
        .unwrap()
        .into_iter()
        .map(|log| log.start_time)
        .collect();
    assert_eq!(starts, vec![100, 150, 300]);

    let everything = fx
        .service
        .get_all_work_logs_for_employee("ada", "acme", TimeWindow::unbounded())
        .unwrap();
    assert_eq!(everything.len(), 4);
    assert!(fx
        .service
        .get_all_work_logs_for_employee("bob", "acme", TimeWindow::unbounded())
        .unwrap()
        .is_empty());
}
