//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, store
//! management and argument parsing.

use crate::error::CliError;
use chrono::{DateTime, NaiveDate, Utc};
use staybook::config::OutputFormat;
use staybook::database::DATABASE_FILE_NAME;
use staybook::{BookingEngine, Config, ConfigBuilder, Database, DatabaseConfig, ReservationId};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic store initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir`, then `STAYBOOK_DATA_DIR`, then
/// `~/.staybook`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => staybook::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load layered configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (`STAYBOOK_*`)
/// 2. `<data_dir>/config.yaml`
/// 3. Built-in defaults
///
/// Global flags are applied on top by the callers that use them.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Build the store configuration from flags and configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the store doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn database_config(
    global: &GlobalOptions,
    config: &Config,
) -> Result<DatabaseConfig, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && (global.disable_autoinit || config.autoinit_disabled()) {
        return Err(CliError::NoDataDirectory);
    }

    // --busy-timeout wins over maximum_lock_wait_seconds
    let busy_timeout = global
        .busy_timeout
        .map_or_else(|| config.lock_wait(), |secs| Duration::from_secs(secs.into()));

    Ok(DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout))
}

/// Open the reservation store.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    Database::open(database_config(global, config)?).map_err(CliError::from)
}

/// Load configuration and open an engine over the store.
pub fn open_engine(global: &GlobalOptions) -> Result<(Config, BookingEngine), CliError> {
    let config = load_configuration(global)?;
    let db = open_database(global, &config)?;
    let engine = BookingEngine::from_config(db, &config);
    Ok((config, engine))
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("'{s}' is not a YYYY-MM-DD date: {e}"))
}

/// Parse a reservation id argument.
pub fn parse_reservation_id(s: &str) -> Result<ReservationId, String> {
    s.parse::<ReservationId>().map_err(|e| e.to_string())
}

/// Parse an output format argument.
pub fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Pick the output format: flag, then configuration, then table.
pub fn resolve_output_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or(config.output_format).unwrap_or_default()
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
