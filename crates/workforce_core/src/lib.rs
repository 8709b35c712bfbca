//! Transactional persistence core for the multi-tenant workforce API.
//! Query modules in this crate are the only code that talks to the store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{
    open_db, open_db_in_memory, ConnectionProvider, DatabasePool, DbError, DbResult,
    PooledConnection,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::account::Account;
pub use model::business::Business;
pub use model::client::{Client, ClientId};
pub use model::employee::Employee;
pub use model::location::{Location, LocationId, LocationOwnerId};
pub use model::report::{RankRange, Ranked, TimeWindow};
pub use model::validation::ValidationError;
pub use model::work_log::{WorkLog, WorkLogId};
pub use repo::error::{StoreError, StoreResult};
pub use service::workforce_service::WorkforceService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
