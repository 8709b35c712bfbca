//! Pooled Connection Provider.
//!
//! # Responsibility
//! - Define the `acquire()` contract query runners depend on.
//! - Own the r2d2 pool with an explicit open/shutdown lifecycle.
//!
//! # Invariants
//! - The pool is an injected handle; there is no process-global instance.
//! - Migrations are applied before `open` returns.
//! - A connection is exclusively owned by one checkout until it is dropped.

use super::migrations::apply_migrations;
use super::open::{configure_connection, enable_wal};
use super::{DbError, DbResult};
use crate::config::DatabaseConfig;
use log::{error, info};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A checked-out SQLite connection; returns to its pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Supplies one physical connection per logical operation.
pub trait ConnectionProvider: Send + Sync {
    /// Checks out a connection, failing when the pool is exhausted past its
    /// timeout or the store cannot be opened.
    fn acquire(&self) -> DbResult<PooledConnection>;
}

/// SQLite connection pool shared by request-handling threads.
#[derive(Clone)]
pub struct DatabasePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DatabasePool {
    /// Builds the pool for `config` and brings the schema up to date.
    ///
    /// # Side effects
    /// - Opens up to `max_connections` SQLite connections eagerly.
    /// - Emits `db_pool_open` logging events with duration and status.
    pub fn open(config: &DatabaseConfig) -> DbResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=db_pool_open module=db status=start max_connections={} path={}",
            config.max_connections,
            config.path.display()
        );

        match build_pool(config) {
            Ok(pool) => {
                info!(
                    "event=db_pool_open module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    pool,
                    path: config.path.clone(),
                })
            }
            Err(err) => {
                error!(
                    "event=db_pool_open module=db status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `(open_connections, idle_connections)`.
    pub fn usage(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.connections, state.idle_connections)
    }

    /// Stops handing out connections from this handle.
    ///
    /// Connections still checked out elsewhere close when their holders drop
    /// them.
    pub fn shutdown(self) {
        let (connections, idle) = self.usage();
        info!(
            "event=db_pool_shutdown module=db status=ok connections={} idle={}",
            connections, idle
        );
        drop(self.pool);
    }
}

impl ConnectionProvider for DatabasePool {
    fn acquire(&self) -> DbResult<PooledConnection> {
        self.pool.get().map_err(|err| {
            error!(
                "event=db_acquire module=db status=error error_code=pool_exhausted error={}",
                err
            );
            DbError::Pool(err)
        })
    }
}

fn build_pool(config: &DatabaseConfig) -> DbResult<r2d2::Pool<SqliteConnectionManager>> {
    let busy_timeout = config.busy_timeout();
    let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
        configure_connection(conn, busy_timeout)?;
        enable_wal(conn)
    });

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(config.connection_timeout())
        .build(manager)?;

    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    drop(conn);

    Ok(pool)
}
