//! Storage configuration for the pooled Connection Provider.
//!
//! # Responsibility
//! - Describe where the database lives and how the pool is sized.
//! - Load those settings from the process environment or serde sources.
//!
//! # Invariants
//! - A validated config never has an empty path or a zero-sized pool.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "WORKFORCE_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "WORKFORCE_DB_MAX_CONNECTIONS";
pub const ENV_DB_CONNECTION_TIMEOUT_MS: &str = "WORKFORCE_DB_CONNECTION_TIMEOUT_MS";
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "WORKFORCE_DB_BUSY_TIMEOUT_MS";

const DEFAULT_DB_FILE_NAME: &str = "workforce.sqlite3";
const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Configuration errors raised while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable is set but does not parse.
    InvalidValue { key: &'static str, value: String },
    EmptyPath,
    ZeroPoolSize,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
            Self::EmptyPath => write!(f, "database path cannot be empty"),
            Self::ZeroPoolSize => write!(f, "max_connections must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for [`crate::db::DatabasePool`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. Pooled access requires a real file.
    pub path: PathBuf,
    /// Upper bound of simultaneously checked-out connections.
    pub max_connections: u32,
    /// How long `acquire()` waits for a free connection before failing.
    pub connection_timeout_ms: u64,
    /// SQLite busy handler timeout applied to every pooled connection.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    /// Builds a default config pointing at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Loads settings from `WORKFORCE_DB_*` variables on top of defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            config.path = PathBuf::from(path.trim());
        }
        if let Some(value) = lookup(ENV_DB_MAX_CONNECTIONS) {
            config.max_connections = parse_number(ENV_DB_MAX_CONNECTIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_DB_CONNECTION_TIMEOUT_MS) {
            config.connection_timeout_ms = parse_number(ENV_DB_CONNECTION_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_DB_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = parse_number(ENV_DB_BUSY_TIMEOUT_MS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_without_variables_uses_defaults() {
        let config = DatabaseConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DatabaseConfig::default());
    }

    #[test]
    fn from_lookup_reads_every_setting() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/workforce/db.sqlite3"),
            (ENV_DB_MAX_CONNECTIONS, "3"),
            (ENV_DB_CONNECTION_TIMEOUT_MS, " 250 "),
            (ENV_DB_BUSY_TIMEOUT_MS, "1000"),
        ]))
        .unwrap();

        assert_eq!(config.path, PathBuf::from("/var/lib/workforce/db.sqlite3"));
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.connection_timeout(), Duration::from_millis(250));
        assert_eq!(config.busy_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn from_lookup_rejects_unparsable_numbers() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "many")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_DB_MAX_CONNECTIONS,
                value: "many".to_string(),
            }
        );
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{ "path": "/tmp/workforce.db", "max_connections": 2 }"#)
                .unwrap();

        assert_eq!(config.path, PathBuf::from("/tmp/workforce.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connection_timeout_ms, DEFAULT_CONNECTION_TIMEOUT_MS);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn validate_rejects_zero_pool_and_empty_path() {
        let zero_pool = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert_eq!(zero_pool.validate(), Err(ConfigError::ZeroPoolSize));

        let empty_path = DatabaseConfig::with_path("");
        assert_eq!(empty_path.validate(), Err(ConfigError::EmptyPath));
    }
}
