//! Employee persistence and hierarchy resolution.
//!
//! # Responsibility
//! - Create an employee together with its account as one unit.
//! - Read employees with their account and resolved manager chain.
//! - Rank employees of a business by time worked.
//!
//! # Invariants
//! - Parent resolution stops after `MAX_PARENT_DEPTH` managers or at the
//!   first user name already on the chain; the truncated chain is returned.

use super::account_repo::{insert_account, select_account};
use super::error::{map_read_error, map_store_error, StoreError, StoreResult};
use super::query_runner::QueryRunner;
use crate::db::{ConnectionProvider, DbError};
use crate::model::employee::Employee;
use crate::model::report::{worked_millis_from_total, RankRange, Ranked, TimeWindow};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

/// Upper bound on the manager chain walked by a single read.
pub const MAX_PARENT_DEPTH: usize = 32;

struct EmployeeRow {
    user_name: String,
    business_tag: String,
    first_name: String,
    sur_name: String,
    parent_user_name: Option<String>,
    job_role: String,
}

pub(crate) fn insert_employee(conn: &Connection, employee: &Employee) -> StoreResult<()> {
    conn.prepare_cached(
        "INSERT INTO Employee (userName, businessTag, firstName, surName, parentUserName, jobRole)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            employee.user_name(),
            employee.business_tag(),
            employee.first_name,
            employee.sur_name,
            employee.parent_user_name,
            employee.job_role,
        ])
    })
    .map_err(|err| map_store_error(err, employee.account.key()))?;

    Ok(())
}

/// Inserts the account and then the employee row on the caller's
/// transaction.
pub(crate) fn insert_employee_with_account(
    conn: &Connection,
    employee: &Employee,
) -> StoreResult<()> {
    insert_account(conn, &employee.account)?;
    insert_employee(conn, employee)
}

fn select_employee_row(
    conn: &Connection,
    user_name: &str,
    business_tag: &str,
) -> StoreResult<Option<EmployeeRow>> {
    conn.prepare_cached(
        "SELECT userName, businessTag, firstName, surName, parentUserName, jobRole
         FROM Employee
         WHERE userName = ?1 AND businessTag = ?2;",
    )
    .and_then(|mut stmt| {
        stmt.query_row(params![user_name, business_tag], parse_employee_row)
            .optional()
    })
    .map_err(map_read_error)
}

fn parse_employee_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmployeeRow> {
    Ok(EmployeeRow {
        user_name: row.get("userName")?,
        business_tag: row.get("businessTag")?,
        first_name: row.get("firstName")?,
        sur_name: row.get("surName")?,
        parent_user_name: row.get("parentUserName")?,
        job_role: row.get("jobRole")?,
    })
}

/// Loads one employee with account and bounded manager chain.
pub(crate) fn load_employee(
    conn: &Connection,
    user_name: &str,
    business_tag: &str,
) -> StoreResult<Option<Employee>> {
    let mut chain: Vec<String> = Vec::new();
    load_employee_chain(conn, user_name, business_tag, &mut chain)
}

fn load_employee_chain(
    conn: &Connection,
    user_name: &str,
    business_tag: &str,
    chain: &mut Vec<String>,
) -> StoreResult<Option<Employee>> {
    let Some(row) = select_employee_row(conn, user_name, business_tag)? else {
        return Ok(None);
    };
    chain.push(row.user_name.clone());

    let account = select_account(conn, &row.user_name, &row.business_tag)?.ok_or_else(|| {
        StoreError::data_access(
            "assembling an employee",
            DbError::InvalidData(format!(
                "employee `{}/{}` has no account row",
                row.business_tag, row.user_name
            )),
        )
    })?;

    let parent = match row.parent_user_name.as_deref() {
        None => None,
        Some(parent_name) if chain.iter().any(|seen| seen == parent_name) => {
            warn!(
                "event=employee_parent module=repo status=warn detail=cycle_detected business_tag={} user_name={} parent={}",
                row.business_tag, row.user_name, parent_name
            );
            None
        }
        Some(_) if chain.len() > MAX_PARENT_DEPTH => {
            warn!(
                "event=employee_parent module=repo status=warn detail=depth_limit business_tag={} user_name={} max_depth={}",
                row.business_tag, row.user_name, MAX_PARENT_DEPTH
            );
            None
        }
        Some(parent_name) => {
            load_employee_chain(conn, parent_name, &row.business_tag, chain)?.map(Box::new)
        }
    };

    Ok(Some(Employee {
        account,
        first_name: row.first_name,
        sur_name: row.sur_name,
        parent_user_name: row.parent_user_name,
        job_role: row.job_role,
        parent,
    }))
}

fn load_employees_by_key(
    conn: &Connection,
    keys: Vec<(String, String)>,
) -> StoreResult<Vec<Employee>> {
    let mut employees = Vec::with_capacity(keys.len());
    for (user_name, business_tag) in keys {
        if let Some(employee) = load_employee(conn, &user_name, &business_tag)? {
            employees.push(employee);
        }
    }
    Ok(employees)
}

fn select_employee_keys(conn: &Connection, business_tag: &str) -> StoreResult<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT userName, businessTag
             FROM Employee
             WHERE businessTag = ?1
             ORDER BY userName ASC;",
        )
        .map_err(map_read_error)?;
    let rows = stmt
        .query_map([business_tag], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(map_read_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

fn select_ranked_employee_keys(
    conn: &Connection,
    business_tag: &str,
    ranks: RankRange,
    window: TimeWindow,
) -> StoreResult<Vec<(String, String, i64)>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT Employee.userName, Employee.businessTag,
                    TOTAL(WorkLog.endTime - WorkLog.startTime) AS workedMillis
             FROM Employee
             LEFT JOIN WorkLog
                ON Employee.userName = WorkLog.userName
               AND Employee.businessTag = WorkLog.businessTag
               AND WorkLog.startTime >= ?1
               AND WorkLog.endTime <= ?2
             WHERE Employee.businessTag = ?3
             GROUP BY Employee.userName, Employee.businessTag
             ORDER BY workedMillis DESC, Employee.userName ASC
             LIMIT ?4 OFFSET ?5;",
        )
        .map_err(map_read_error)?;
    let rows = stmt
        .query_map(
            params![
                window.start(),
                window.end(),
                business_tag,
                ranks.limit(),
                ranks.offset()
            ],
            |row| {
                let worked_millis = worked_millis_from_total(row.get("workedMillis")?);
                Ok((row.get(0)?, row.get(1)?, worked_millis))
            },
        )
        .map_err(map_read_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_read_error)
}

/// Query module for employee operations.
pub struct EmployeeQueries {
    runner: QueryRunner,
}

impl EmployeeQueries {
    pub fn new(provider: &dyn ConnectionProvider) -> StoreResult<Self> {
        Ok(Self {
            runner: QueryRunner::acquire(provider, "employee")?,
        })
    }

    /// Creates the account and the employee as one unit.
    ///
    /// # Errors
    /// - `BadKey` for a duplicate `(userName, businessTag)`, an unknown
    ///   business or an unknown parent.
    pub fn create_employee(mut self, employee: &Employee) -> StoreResult<()> {
        if let Err(err) = employee.validate() {
            return self.runner.finish(Err(err.into()));
        }

        let result = self
            .runner
            .in_transaction(|conn| insert_employee_with_account(conn, employee));
        self.runner.finish(result)
    }

    /// Returns `None` when the employee does not exist.
    pub fn get_employee(self, user_name: &str, business_tag: &str) -> StoreResult<Option<Employee>> {
        let result = self
            .runner
            .read(|conn| load_employee(conn, user_name, business_tag));
        self.runner.finish(result)
    }

    /// All employees of a business ordered by user name.
    pub fn get_all_employees(self, business_tag: &str) -> StoreResult<Vec<Employee>> {
        let result = self.runner.read(|conn| {
            let keys = select_employee_keys(conn, business_tag)?;
            load_employees_by_key(conn, keys)
        });
        self.runner.finish(result)
    }

    /// Employees ranked by time worked inside `window`, sliced to `ranks`.
    pub fn get_all_employees_by_most_worked_range(
        self,
        business_tag: &str,
        ranks: RankRange,
        window: TimeWindow,
    ) -> StoreResult<Vec<Ranked<Employee>>> {
        let result = self.runner.read(|conn| {
            let ranked = select_ranked_employee_keys(conn, business_tag, ranks, window)?;
            let mut report = Vec::with_capacity(ranked.len());
            for (user_name, tag, worked_millis) in ranked {
                if let Some(item) = load_employee(conn, &user_name, &tag)? {
                    report.push(Ranked {
                        item,
                        worked_millis,
                    });
                }
            }
            Ok(report)
        });
        self.runner.finish(result)
    }
}
