//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured pool once, which applies pending migrations.
//! - Print core and schema versions for quick deployment checks.

use log::info;
use std::path::Path;
use std::process::ExitCode;
use workforce_core::db::migrations::current_user_version;
use workforce_core::{ConnectionProvider, DatabaseConfig, DatabasePool};

const ENV_LOG_DIR: &str = "WORKFORCE_LOG_DIR";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("workforce_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        workforce_core::init_logging(workforce_core::default_log_level(), Path::new(&log_dir))
            .map_err(|err| err.to_string())?;
    }

    let config = DatabaseConfig::from_env().map_err(|err| err.to_string())?;
    let pool = DatabasePool::open(&config).map_err(|err| err.to_string())?;

    let schema_version = {
        let conn = pool.acquire().map_err(|err| err.to_string())?;
        current_user_version(&conn).map_err(|err| err.to_string())?
    };

    println!("workforce_core ping={}", workforce_core::ping());
    println!("workforce_core version={}", workforce_core::core_version());
    println!("database path={}", pool.path().display());
    println!("schema version={schema_version}");
    info!(
        "event=cli_probe module=cli status=ok schema_version={}",
        schema_version
    );

    pool.shutdown();
    Ok(())
}
