//! Query modules over the pooled SQLite store.
//!
//! # Responsibility
//! - One query module per aggregate, each driving a single [`QueryRunner`].
//! - Translate store failures into the `StoreError` taxonomy.
//!
//! # Invariants
//! - Every module operation consumes the module, so one runner serves exactly
//!   one logical operation and is released before the call returns.
//! - Multi-statement writes are all-or-nothing.
//!
//! [`QueryRunner`]: query_runner::QueryRunner

pub mod account_repo;
pub mod business_repo;
pub mod client_repo;
pub mod employee_repo;
pub mod error;
pub mod location_repo;
pub mod query_runner;
pub mod work_log_repo;
