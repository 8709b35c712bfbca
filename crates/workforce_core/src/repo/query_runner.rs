//! Single-use unit of work over one pooled connection.
//!
//! # Responsibility
//! - Acquire exactly one connection per logical operation.
//! - Drive the autocommit/transaction boundary of multi-statement writes.
//! - Release cursors and the connection on every exit path.
//!
//! # Invariants
//! - A runner is never shared between operations or threads.
//! - Toggle and close failures are logged, never returned, so they cannot
//!   mask the error of the operation itself.
//! - `release` is idempotent and also runs on drop.
//!
//! State machine: `Acquired/Idle -> InTransaction -> Committed | RolledBack
//! -> Idle -> Closed`.

use super::error::{StoreError, StoreResult};
use crate::db::{ConnectionProvider, DbError, PooledConnection};
use log::{debug, error, warn};
use rusqlite::Connection;

pub struct QueryRunner {
    connection: Option<PooledConnection>,
    operation: &'static str,
}

impl QueryRunner {
    /// Checks out a connection for `operation`.
    ///
    /// # Errors
    /// - `StoreError::DataAccess` when the provider cannot supply one.
    pub fn acquire(provider: &dyn ConnectionProvider, operation: &'static str) -> StoreResult<Self> {
        match provider.acquire() {
            Ok(connection) => {
                debug!(
                    "event=runner_acquire module=repo status=ok operation={}",
                    operation
                );
                Ok(Self {
                    connection: Some(connection),
                    operation,
                })
            }
            Err(err) => {
                error!(
                    "event=runner_acquire module=repo status=error operation={} error={}",
                    operation, err
                );
                Err(StoreError::data_access("acquiring a connection", err))
            }
        }
    }

    /// Borrows the live connection.
    ///
    /// # Errors
    /// - `StoreError::DataAccess` once the connection has been closed.
    pub fn connection(&self) -> StoreResult<&Connection> {
        match self.connection.as_deref() {
            Some(conn) => Ok(conn),
            None => Err(StoreError::data_access(
                "using a released runner",
                DbError::InvalidData(format!(
                    "connection for `{}` was already closed",
                    self.operation
                )),
            )),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    /// True when no transaction is open. A closed runner reports true.
    pub fn is_auto_commit(&self) -> bool {
        self.connection
            .as_deref()
            .map_or(true, Connection::is_autocommit)
    }

    /// Turns autocommit on or off, best-effort.
    ///
    /// Disabling opens an immediate (write-locking) transaction. Enabling while
    /// a transaction is still open rolls that transaction back.
    pub fn set_auto_commit(&mut self, enabled: bool) {
        let Some(conn) = self.connection.as_deref() else {
            error!(
                "event=runner_autocommit module=repo status=error operation={} enabled={} error=connection_closed",
                self.operation, enabled
            );
            return;
        };

        if conn.is_autocommit() == enabled {
            return;
        }

        let statement = if enabled {
            warn!(
                "event=runner_autocommit module=repo status=warn operation={} detail=open_transaction_rolled_back",
                self.operation
            );
            "ROLLBACK;"
        } else {
            "BEGIN IMMEDIATE;"
        };

        if let Err(err) = conn.execute_batch(statement) {
            error!(
                "event=runner_autocommit module=repo status=error operation={} enabled={} detail=consistency_errors_may_be_present error={}",
                self.operation, enabled, err
            );
        }
    }

    /// Commits the open transaction; warns and does nothing under autocommit.
    pub fn commit(&mut self) -> StoreResult<()> {
        let conn = self.connection()?;
        if conn.is_autocommit() {
            warn!(
                "event=runner_commit module=repo status=warn operation={} detail=autocommit_enabled",
                self.operation
            );
            return Ok(());
        }

        conn.execute_batch("COMMIT;").map_err(|err| {
            error!(
                "event=runner_commit module=repo status=error operation={} error={}",
                self.operation, err
            );
            StoreError::data_access("committing a transaction", err)
        })
    }

    /// Discards the open transaction; warns and does nothing under autocommit.
    pub fn rollback(&mut self) -> StoreResult<()> {
        let conn = self.connection()?;
        if conn.is_autocommit() {
            warn!(
                "event=runner_rollback module=repo status=warn operation={} detail=autocommit_enabled",
                self.operation
            );
            return Ok(());
        }

        conn.execute_batch("ROLLBACK;").map_err(|err| {
            error!(
                "event=runner_rollback module=repo status=error operation={} error={}",
                self.operation, err
            );
            StoreError::data_access("rolling back a transaction", err)
        })
    }

    /// Runs `work` as one all-or-nothing transaction.
    ///
    /// On error the transaction is rolled back before the error is returned;
    /// a failing rollback is logged and the primary error is returned. Autocommit is
    /// restored on every path.
    pub fn in_transaction<T>(
        &mut self,
        work: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.set_auto_commit(false);

        let outcome = match self.connection() {
            Ok(conn) if conn.is_autocommit() => Err(StoreError::data_access(
                "opening a transaction",
                DbError::InvalidData(format!(
                    "could not disable autocommit for `{}`",
                    self.operation
                )),
            )),
            Ok(conn) => work(conn),
            Err(err) => Err(err),
        };

        let outcome = match outcome {
            Ok(value) => self.commit().map(|()| value),
            Err(err) => Err(err),
        };

        if outcome.is_err() && !self.is_auto_commit() {
            if let Err(rollback_err) = self.rollback() {
                error!(
                    "event=runner_rollback module=repo status=error operation={} detail=primary_error_kept error={}",
                    self.operation, rollback_err
                );
            }
        }

        self.set_auto_commit(true);
        outcome
    }

    /// Runs a read-only `work` under autocommit.
    pub fn read<T>(&self, work: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        work(self.connection()?)
    }

    /// Drops every cached prepared statement, closing their cursors.
    pub fn close_result_set(&mut self) {
        if let Some(conn) = self.connection.as_deref() {
            conn.flush_prepared_statement_cache();
        }
    }

    /// Hands the connection back to the pool. Idempotent.
    ///
    /// A transaction still open at this point is rolled back first so the
    /// next borrower starts clean.
    pub fn close_connection(&mut self) {
        let Some(conn) = self.connection.take() else {
            return;
        };

        if !conn.is_autocommit() {
            if let Err(err) = conn.execute_batch("ROLLBACK;") {
                error!(
                    "event=runner_close module=repo status=error operation={} detail=resources_may_be_leaking error={}",
                    self.operation, err
                );
            }
        }

        drop(conn);
        debug!(
            "event=runner_close module=repo status=ok operation={}",
            self.operation
        );
    }

    /// Closes cursors then the connection.
    pub fn release(&mut self) {
        self.close_result_set();
        self.close_connection();
    }

    /// Releases the runner and passes `result` through.
    pub fn finish<T>(mut self, result: StoreResult<T>) -> StoreResult<T> {
        self.release();
        result
    }
}

impl Drop for QueryRunner {
    fn drop(&mut self) {
        self.release();
    }
}
