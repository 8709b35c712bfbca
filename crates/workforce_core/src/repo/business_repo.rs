//! Business persistence.
//!
//! # Invariants
//! - A business is created together with its bootstrap account and employee;
//!   no reader can observe a business without its first employee.

use super::employee_repo::insert_employee_with_account;
use super::error::{map_read_error, map_store_error, StoreResult};
use super::query_runner::QueryRunner;
use crate::db::ConnectionProvider;
use crate::model::business::Business;
use crate::model::employee::Employee;
use crate::model::validation::{require_non_empty, ValidationError};
use rusqlite::{params, Connection, OptionalExtension};

fn insert_business(conn: &Connection, business: &Business) -> StoreResult<()> {
    conn.prepare_cached("INSERT INTO Business (businessTag, businessName) VALUES (?1, ?2);")
        .and_then(|mut stmt| stmt.execute(params![business.business_tag, business.business_name]))
        .map_err(|err| map_store_error(err, business.business_tag.as_str()))?;
    Ok(())
}

fn parse_business_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Business> {
    Ok(Business {
        business_tag: row.get("businessTag")?,
        business_name: row.get("businessName")?,
    })
}

fn validate_bootstrap(business: &Business, owner: &Employee) -> Result<(), ValidationError> {
    require_non_empty("businessTag", &business.business_tag)?;
    owner.validate()?;
    if owner.business_tag() != business.business_tag {
        return Err(ValidationError::BusinessTagMismatch {
            expected: business.business_tag.clone(),
            actual: owner.business_tag().to_string(),
        });
    }
    Ok(())
}

/// Query module for business operations.
pub struct BusinessQueries {
    runner: QueryRunner,
}

impl BusinessQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "business")?,
        })
    }

    /// Creates `business`, then the owner's account, then the owner's
    /// employee row, all or nothing.
    ///
    /// # Errors
    /// - `Validation` when `owner` belongs to another business tag.
    /// - `BadKey` carrying the business tag on a duplicate business, or
    ///   `businessTag/userName` when the account or employee insert fails.
    pub fn create_business(mut self, business: &Business, owner: &Employee) -> StoreResult<()> {
        if let Err(err) = validate_bootstrap(business, owner) {
            return self.runner.finish(Err(err.into()));
        }

        let result = self.runner.in_transaction(|conn| {
            insert_business(conn, business)?;
            insert_employee_with_account(conn, owner)
        });
        self.runner.finish(result)
    }

    /// Returns `None` when the tag is unknown.
    pub fn get_business(self, business_tag: &str) -> StoreResult<Option<Business>> {
        let result = self.runner.read(|conn| {
            conn.prepare_cached(
                "SELECT businessTag, businessName FROM Business WHERE businessTag = ?1;",
            )
            .and_then(|mut stmt| stmt.query_row([business_tag], parse_business_row).optional())
            .map_err(map_read_error)
        });
        self.runner.finish(result)
    }

    /// Every business ordered by name, then tag.
    pub fn get_all_businesses(self) -> StoreResult<Vec<Business>> {
        let result = self.runner.read(|conn| {
            let mut stmt = conn
                .prepare_cached(
                    "SELECT businessTag, businessName
                     FROM Business
                     ORDER BY businessName ASC, businessTag ASC;",
                )
                .map_err(map_read_error)?;
            let rows = stmt
                .query_map([], parse_business_row)
                .map_err(map_read_error)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
        });
        self.runner.finish(result)
    }
}
