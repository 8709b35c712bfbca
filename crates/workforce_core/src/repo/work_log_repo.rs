//! Work log persistence.
//!
//! # Responsibility
//! - Validate and record a work log with its optional location.
//! - Read single logs and an employee's logs inside a time window.
//!
//! # Invariants
//! - `startTime < endTime` and an `i64` duration are checked before any
//!   statement runs.
//! - Every stored log has an owner anchor, with or without a location.
//! - Reads surface at most one location per log.

use super::error::{map_read_error, map_store_error, StoreResult};
use super::location_repo::{
    attach_locations, create_location_owner, get_locations_for_optional_owner,
};
use super::query_runner::QueryRunner;
use crate::db::ConnectionProvider;
use crate::model::location::LocationOwnerId;
use crate::model::report::TimeWindow;
use crate::model::work_log::{WorkLog, WorkLogId};
use rusqlite::{params, Connection, OptionalExtension};
use std::slice;

const WORK_LOG_SELECT_SQL: &str =
    "SELECT workLogId, userName, businessTag, clientId, startTime, endTime, description, locationOwnerId
FROM WorkLog";

struct WorkLogRow {
    log: WorkLog,
    location_owner_id: Option<LocationOwnerId>,
}

impl WorkLogRow {
    fn into_work_log(self, conn: &Connection) -> StoreResult<WorkLog> {
        let mut log = self.log;
        log.location = get_locations_for_optional_owner(conn, self.location_owner_id)?
            .into_iter()
            .next();
        Ok(log)
    }
}

fn parse_work_log_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkLogRow> {
    Ok(WorkLogRow {
        log: WorkLog {
            work_log_id: Some(row.get("workLogId")?),
            user_name: row.get("userName")?,
            business_tag: row.get("businessTag")?,
            client_id: row.get("clientId")?,
            start_time: row.get("startTime")?,
            end_time: row.get("endTime")?,
            description: row.get("description")?,
            location: None,
        },
        location_owner_id: row.get("locationOwnerId")?,
    })
}

fn insert_work_log(
    conn: &Connection,
    log: &WorkLog,
    owner_id: LocationOwnerId,
) -> StoreResult<WorkLogId> {
    conn.prepare_cached(
        "INSERT INTO WorkLog
            (userName, businessTag, clientId, startTime, endTime, description, locationOwnerId)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )
    .and_then(|mut stmt| {
        stmt.insert(params![
            log.user_name,
            log.business_tag,
            log.client_id,
            log.start_time,
            log.end_time,
            log.description,
            owner_id,
        ])
    })
    .map_err(|err| {
        map_store_error(
            err,
            format!("{}/{}/{}", log.business_tag, log.user_name, log.client_id),
        )
    })
}

fn select_work_log_row(conn: &Connection, work_log_id: WorkLogId) -> StoreResult<Option<WorkLogRow>> {
    conn.prepare_cached(&format!("{WORK_LOG_SELECT_SQL} WHERE workLogId = ?1;"))
        .and_then(|mut stmt| stmt.query_row([work_log_id], parse_work_log_row).optional())
        .map_err(map_read_error)
}

fn select_work_log_rows_for_employee(
    conn: &Connection,
    user_name: &str,
    business_tag: &str,
    window: TimeWindow,
) -> StoreResult<Vec<WorkLogRow>> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "{WORK_LOG_SELECT_SQL}
             WHERE userName = ?1 AND businessTag = ?2 AND startTime >= ?3 AND endTime <= ?4
             ORDER BY startTime ASC, workLogId ASC;"
        ))
        .map_err(map_read_error)?;
    let rows = stmt
        .query_map(
            params![user_name, business_tag, window.start(), window.end()],
            parse_work_log_row,
        )
        .map_err(map_read_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

/// Query module for work log operations.
pub struct WorkLogQueries {
    runner: QueryRunner,
}

impl WorkLogQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "work_log")?,
        })
    }

    /// Records `log` and returns its generated id.
    ///
    /// # Errors
    /// - `Validation` for an empty, inverted or overflowing time range; nothing
///   is written.
    /// - `BadKey` for an unknown employee or client.
    pub fn create_work_log(mut self, log: &WorkLog) -> StoreResult<WorkLogId> {
        if let Err(err) = log.validate() {
            return self.runner.finish(Err(err.into()));
        }

        let result = self.runner.in_transaction(|conn| {
            let owner_id = create_location_owner(conn)?;
            let work_log_id = insert_work_log(conn, log, owner_id)?;
            if let Some(location) = &log.location {
                attach_locations(conn, owner_id, slice::from_ref(location))?;
            }
            Ok(work_log_id)
        });
        self.runner.finish(result)
    }

    /// Returns `None` without further lookups when the id is unknown.
    pub fn get_work_log(self, work_log_id: WorkLogId) -> StoreResult<Option<WorkLog>> {
        let result = self
            .runner
            .read(|conn| match select_work_log_row(conn, work_log_id)? {
                Some(row) => row.into_work_log(conn).map(Some),
                None => Ok(None),
            });
        self.runner.finish(result)
    }

    /// `None` for an unknown log or a log stored without an owner anchor.
    pub fn get_work_log_location_owner_id(
        self,
        work_log_id: WorkLogId,
    ) -> StoreResult<Option<LocationOwnerId>> {
        let result = self.runner.read(|conn| {
            conn.prepare_cached("SELECT locationOwnerId FROM WorkLog WHERE workLogId = ?1;")
                .and_then(|mut stmt| {
                    stmt.query_row([work_log_id], |row| row.get::<_, Option<LocationOwnerId>>(0))
                        .optional()
                })
                .map(Option::flatten)
                .map_err(map_read_error)
        });
        self.runner.finish(result)
    }

    /// Logs of one employee lying fully inside `window`, oldest first.
    pub fn get_all_work_logs_for_employee(
        self,
        user_name: &str,
        business_tag: &str,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkLog>> {
        let result = self.runner.read(|conn| {
            select_work_log_rows_for_employee(conn, user_name, business_tag, window)?
                .into_iter()
                .map(|row| row.into_work_log(conn))
                .collect::<StoreResult<Vec<_>>>()
        });
        self.runner.finish(result)
    }
}
