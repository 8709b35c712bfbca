//! Domain value objects for the workforce persistence core.
//!
//! # Responsibility
//! - Define the plain data shapes exchanged with the request-handling layer.
//! - Host invariants that are checkable without touching the store.
//!
//! # Invariants
//! - Surrogate ids are `None` until the store has assigned them.
//! - `WorkLog::start_time < WorkLog::end_time` for anything persisted.

pub mod account;
pub mod business;
pub mod client;
pub mod employee;
pub mod location;
pub mod report;
pub mod validation;
pub mod work_log;
