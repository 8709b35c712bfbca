//! Versioned schema for the workforce store.
//!
//! # Responsibility
//! - List every schema step with its target `PRAGMA user_version`.
//! - Bring a database up to [`latest_version`] in one write-locked
//!   transaction.
//!
//! # Invariants
//! - Steps are listed in strictly increasing version order.
//! - The stored version is re-read after the write lock is taken, so two
//!   openers racing on a fresh file apply each step once.
//! - Version 1 is the businessTag-keyed, location-owner-indirected schema;
//!   older schema generations are not migrated from.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "workforce_tables",
    sql: include_str!("0001_init.sql"),
}];

/// Newest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version stamped on the connection's database.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Applies every step newer than the stored version.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   build.
/// - `DbError::Sqlite` when a step fails; nothing from this call is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;
    let stored = current_user_version(&tx)?;
    let latest = latest_version();

    match stored.cmp(&latest) {
        Ordering::Greater => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: stored,
                latest_supported: latest,
            })
        }
        Ordering::Equal => {
            debug!(
                "event=db_migrate module=db status=ok detail=up_to_date version={}",
                stored
            );
            return Ok(());
        }
        Ordering::Less => {}
    }

    for step in steps_after(stored) {
        apply_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        stored, latest
    );
    Ok(())
}

fn steps_after(version: u32) -> impl Iterator<Item = &'static SchemaStep> {
    SCHEMA_STEPS.iter().filter(move |step| step.version > version)
}

fn apply_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}
