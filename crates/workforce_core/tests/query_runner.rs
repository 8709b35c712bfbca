use rusqlite::Connection;
use tempfile::TempDir;
use workforce_core::repo::business_repo::BusinessQueries;
use workforce_core::repo::query_runner::QueryRunner;
use workforce_core::{DatabaseConfig, DatabasePool, DbError, StoreError};

fn temp_pool(max_connections: u32) -> (TempDir, DatabasePool) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        max_connections,
        connection_timeout_ms: 200,
        ..DatabaseConfig::with_path(dir.path().join("runner.db"))
    };
    let pool = DatabasePool::open(&config).unwrap();
    (dir, pool)
}

fn business_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM Business;", [], |row| row.get(0))
        .unwrap()
}

fn insert_business(conn: &Connection, tag: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO Business (businessTag, businessName) VALUES (?1, ?2);",
        [tag, "Acme Ltd"],
    )
    .map(|_| ())
    .map_err(|err| StoreError::data_access("test insert", err))
}

#[test]
fn commit_and_rollback_are_no_ops_under_autocommit() {
    let (_dir, pool) = temp_pool(2);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();

    assert!(runner.is_auto_commit());
    runner.commit().unwrap();
    runner.rollback().unwrap();
    assert!(runner.is_auto_commit());
}

#[test]
fn disabling_autocommit_opens_a_transaction_and_enabling_discards_it() {
    let (_dir, pool) = temp_pool(2);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();

    runner.set_auto_commit(false);
    assert!(!runner.is_auto_commit());
    insert_business(runner.connection().unwrap(), "acme").unwrap();

    runner.set_auto_commit(true);
    assert!(runner.is_auto_commit());
    assert_eq!(business_count(runner.connection().unwrap()), 0);
}

#[test]
fn in_transaction_commits_on_success() {
    let (_dir, pool) = temp_pool(2);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();

    let value = runner
        .in_transaction(|conn| insert_business(conn, "acme").map(|()| 7))
        .unwrap();

    assert_eq!(value, 7);
    assert!(runner.is_auto_commit());
    assert_eq!(business_count(runner.connection().unwrap()), 1);
}

#[test]
fn in_transaction_rolls_back_every_statement_on_failure() {
    let (_dir, pool) = temp_pool(2);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();

    let err = runner
        .in_transaction(|conn| {
            insert_business(conn, "acme")?;
            insert_business(conn, "globex")?;
            Err::<(), _>(StoreError::data_access(
                "injected failure",
                DbError::InvalidData("boom".to_string()),
            ))
        })
        .unwrap_err();

    assert!(err.is_data_access());
    assert!(runner.is_auto_commit());
    assert_eq!(business_count(runner.connection().unwrap()), 0);
}

#[test]
fn release_is_idempotent_and_closes_the_connection() {
    let (_dir, pool) = temp_pool(1);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();

    runner.close_result_set();
    runner.release();
    runner.release();
    runner.close_connection();

    assert!(runner.is_closed());
    assert!(runner.connection().unwrap_err().is_data_access());

    // The single pooled connection is available again.
    let again = QueryRunner::acquire(&pool, "test").unwrap();
    assert!(!again.is_closed());
}

#[test]
fn closing_with_an_open_transaction_hands_back_a_clean_connection() {
    let (_dir, pool) = temp_pool(1);
    let mut runner = QueryRunner::acquire(&pool, "test").unwrap();
    runner.set_auto_commit(false);
    insert_business(runner.connection().unwrap(), "acme").unwrap();
    drop(runner);

    let next = QueryRunner::acquire(&pool, "test").unwrap();
    assert!(next.is_auto_commit());
    assert_eq!(business_count(next.connection().unwrap()), 0);
}

#[test]
fn exhausted_pool_surfaces_as_data_access() {
    let (_dir, pool) = temp_pool(1);
    let holder = BusinessQueries::new(&pool).unwrap();

    let err = match BusinessQueries::new(&pool) {
        Ok(_) => panic!("second checkout should time out"),
        Err(err) => err,
    };
    assert!(err.is_data_access());
    assert_eq!(err.bad_key(), None);

    drop(holder);
    assert!(BusinessQueries::new(&pool).is_ok());
}
