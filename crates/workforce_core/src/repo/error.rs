//! Error taxonomy exposed by query modules and the mapper that feeds it.
//!
//! # Invariants
//! - `StoreError` is the only error type leaving a query module.
//! - Constraint violations become `BadKey`; every other store or pool failure
//!   becomes `DataAccess`.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Rejected before any store interaction.
    Validation(ValidationError),
    /// A unique or foreign-key constraint rejected `key`.
    BadKey { key: String, source: DbError },
    /// Connectivity, pool exhaustion or any other store failure.
    DataAccess {
        context: &'static str,
        source: DbError,
    },
}

impl StoreError {
    pub fn data_access(context: &'static str, source: impl Into<DbError>) -> Self {
        Self::DataAccess {
            context,
            source: source.into(),
        }
    }

    /// Offending key of a `BadKey` error.
    pub fn bad_key(&self) -> Option<&str> {
        match self {
            Self::BadKey { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn is_bad_key(&self) -> bool {
        matches!(self, Self::BadKey { .. })
    }

    pub fn is_data_access(&self) -> bool {
        matches!(self, Self::DataAccess { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BadKey { key, source } => {
                write!(f, "key `{key}` violates a store constraint: {source}")
            }
            Self::DataAccess { context, source } => {
                write!(f, "data store unavailable while {context}: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::BadKey { source, .. } => Some(source),
            Self::DataAccess { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Classifies a raw store failure raised while writing `key`.
pub fn map_store_error(err: impl Into<DbError>, key: impl Into<String>) -> StoreError {
    let source = err.into();
    if source.is_constraint_violation() {
        let key = key.into();
        error!(
            "event=store_error module=repo status=error error_code=bad_key key={} error={}",
            key, source
        );
        StoreError::BadKey { key, source }
    } else {
        error!(
            "event=store_error module=repo status=error error_code=data_access error={}",
            source
        );
        StoreError::DataAccess {
            context: "executing a statement",
            source,
        }
    }
}

/// Classifies a failure on a read path; reads never carry a key.
pub fn map_read_error(err: impl Into<DbError>) -> StoreError {
    let source = err.into();
    error!(
        "event=store_error module=repo status=error error_code=data_access error={}",
        source
    );
    StoreError::DataAccess {
        context: "reading from the store",
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite_failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn constraint_violations_become_bad_key_with_key() {
        let err = map_store_error(sqlite_failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY), "acme");
        assert!(err.is_bad_key());
        assert_eq!(err.bad_key(), Some("acme"));
    }

    #[test]
    fn other_failures_become_data_access() {
        let busy = map_store_error(sqlite_failure(ffi::SQLITE_BUSY), "acme");
        assert!(busy.is_data_access());
        assert_eq!(busy.bad_key(), None);

        let missing = map_store_error(rusqlite::Error::QueryReturnedNoRows, "acme");
        assert!(missing.is_data_access());
    }

    #[test]
    fn read_errors_are_always_data_access() {
        let err = map_read_error(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE));
        assert!(err.is_data_access());
        assert!(err.source().is_some());
    }
}
