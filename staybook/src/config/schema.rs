//! Configuration schema definitions.
//!
//! This module defines the configuration structure for staybook: hold
//! expiry, store locking, initialization and output settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default time a pending reservation may wait for confirmation.
pub const DEFAULT_HOLD_TTL_HOURS: u32 = 24;

/// Default cadence of the background expiry sweep.
pub const DEFAULT_SWEEP_INTERVAL_MINUTES: u32 = 60;

/// Default time a writer waits for the store lock.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// Every field is optional so that sources can be layered; accessors fall
/// back to the built-in defaults.
///
/// # Examples
///
/// ```
/// use staybook::config::{Config, ExpiryConfig};
///
/// let config = Config {
///     expiry: Some(ExpiryConfig {
///         hold_ttl_hours: Some(12),
///         sweep_interval_minutes: None,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.hold_ttl(), chrono::Duration::hours(12));
/// assert_eq!(config.sweep_interval().as_secs(), 3600);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Pending-hold expiry settings.
    pub expiry: Option<ExpiryConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

/// Expiry configuration.
///
/// Controls how long unconfirmed reservations hold their dates and how
/// often the sweeper looks for them.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExpiryConfig {
    /// Hours a pending reservation may stay unconfirmed.
    pub hold_ttl_hours: Option<u32>,

    /// Minutes between background sweeps.
    pub sweep_interval_minutes: Option<u32>,
}

impl Config {
    /// Returns the pending-hold time to live.
    #[must_use]
    pub fn hold_ttl(&self) -> chrono::Duration {
        let hours = self
            .expiry
            .as_ref()
            .and_then(|e| e.hold_ttl_hours)
            .unwrap_or(DEFAULT_HOLD_TTL_HOURS);
        chrono::Duration::hours(i64::from(hours))
    }

    /// Returns the interval between background sweeps.
    #[must_use]
    pub fn sweep_interval(&self) -> StdDuration {
        let minutes = self
            .expiry
            .as_ref()
            .and_then(|e| e.sweep_interval_minutes)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_MINUTES);
        StdDuration::from_secs(u64::from(minutes) * 60)
    }

    /// Returns the store busy timeout.
    #[must_use]
    pub fn lock_wait(&self) -> StdDuration {
        StdDuration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// Returns whether automatic initialization is disabled.
    #[must_use]
    pub fn autoinit_disabled(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use staybook::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// Human-readable table format.
    #[default]
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            _ => Err(Error::Validation {
                field: "output_format".into(),
                message: format!("unknown output format '{s}' (expected json, csv or table)"),
            }),
        }
    }
}
