use rusqlite::Connection;
use workforce_core::db::migrations::latest_version;
use workforce_core::db::{open_db, open_db_in_memory, DbError};
use workforce_core::{ConnectionProvider, DatabaseConfig, DatabasePool};

const TABLES: &[&str] = &[
    "Business",
    "Account",
    "Employee",
    "LocationOwner",
    "Location",
    "LocationOwnerToLocation",
    "Client",
    "WorkLog",
];

#[test]
fn open_db_in_memory_applies_canonical_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_a_migrated_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workforce.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "WorkLog");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pool_open_migrates_and_configures_every_connection() {
    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::open(&DatabaseConfig::with_path(dir.path().join("pool.db"))).unwrap();

    let conn = pool.acquire().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);

    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(journal_mode.to_ascii_lowercase(), "wal");
}

#[test]
fn work_log_table_rejects_inverted_ranges_at_store_level() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO WorkLog (userName, businessTag, clientId, startTime, endTime, description)
         VALUES ('ada', 'acme', 1, 10, 10, 'zero');",
    )
    .unwrap_err();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
