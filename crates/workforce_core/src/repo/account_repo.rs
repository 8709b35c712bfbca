//! Account persistence.
//!
//! # Invariants
//! - Accounts are keyed by `(userName, businessTag)`.
//! - The insert helper joins the caller's transaction; business and employee
//!   creation reuse it.

use super::error::{map_read_error, map_store_error, StoreResult};
use super::query_runner::QueryRunner;
use crate::db::ConnectionProvider;
use crate::model::account::Account;
use crate::model::validation::require_non_empty;
use rusqlite::{params, Connection, OptionalExtension};

pub(crate) fn insert_account(conn: &Connection, account: &Account) -> StoreResult<()> {
    conn.prepare_cached(
        "INSERT INTO Account (userName, businessTag, storedPassword, email)
         VALUES (?1, ?2, ?3, ?4);",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            account.user_name,
            account.business_tag,
            account.stored_password,
            account.email,
        ])
    })
    .map_err(|err| map_store_error(err, account.key()))?;

    Ok(())
}

pub(crate) fn select_account(
    conn: &Connection,
    user_name: &str,
    business_tag: &str,
) -> StoreResult<Option<Account>> {
    conn.prepare_cached(
        "SELECT userName, businessTag, storedPassword, email
         FROM Account
         WHERE userName = ?1 AND businessTag = ?2;",
    )
    .and_then(|mut stmt| {
        stmt.query_row(params![user_name, business_tag], |row| {
            Ok(Account {
                user_name: row.get("userName")?,
                business_tag: row.get("businessTag")?,
                stored_password: row.get("storedPassword")?,
                email: row.get("email")?,
            })
        })
        .optional()
    })
    .map_err(map_read_error)
}

pub(crate) fn validate_account(account: &Account) -> StoreResult<()> {
    require_non_empty("userName", &account.user_name)?;
    require_non_empty("businessTag", &account.business_tag)?;
    Ok(())
}

/// Query module for standalone account operations.
pub struct AccountQueries {
    runner: QueryRunner,
}

impl AccountQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "account")?,
        })
    }

    /// Creates a bare account. The business must already exist.
    ///
    /// # Errors
    /// - `BadKey` carrying `businessTag/userName` on a duplicate or unknown
    ///   business.
    pub fn create_account(mut self, account: &Account) -> StoreResult<()> {
        if let Err(err) = validate_account(account) {
            return self.runner.finish(Err(err));
        }

        let result = self
            .runner
            .in_transaction(|conn| insert_account(conn, account));
        self.runner.finish(result)
    }

    /// Returns `None` when no such account exists.
    pub fn get_account(self, user_name: &str, business_tag: &str) -> StoreResult<Option<Account>> {
        let result = self
            .runner
            .read(|conn| select_account(conn, user_name, business_tag));
        self.runner.finish(result)
    }
}
