//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `STAYBOOK_*` environment variables that
//! override configuration file values.

use std::env;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use staybook::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric hours, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("STAYBOOK_HOLD_TTL_HOURS") {
            let hours = Self::parse_number("STAYBOOK_HOLD_TTL_HOURS", &val)?;
            config
                .expiry
                .get_or_insert_with(Default::default)
                .hold_ttl_hours = Some(hours);
        }

        if let Ok(val) = env::var("STAYBOOK_SWEEP_INTERVAL_MINUTES") {
            let minutes = Self::parse_number("STAYBOOK_SWEEP_INTERVAL_MINUTES", &val)?;
            config
                .expiry
                .get_or_insert_with(Default::default)
                .sweep_interval_minutes = Some(minutes);
        }

        if let Ok(val) = env::var("STAYBOOK_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number("STAYBOOK_MAXIMUM_LOCK_WAIT_SECONDS", &val)?);
        }

        if let Ok(val) = env::var("STAYBOOK_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("STAYBOOK_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("STAYBOOK_OUTPUT_FORMAT") {
            config.output_format = Some(val.parse::<OutputFormat>().map_err(|_| {
                Error::Validation {
                    field: "STAYBOOK_OUTPUT_FORMAT".into(),
                    message: format!("Invalid output format: '{val}' (expected json/csv/table)"),
                }
            })?);
        }

        Ok(())
    }

    fn parse_number<T: std::str::FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: "Must be a positive integer".into(),
        })
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
