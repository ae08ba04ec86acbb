//! Configuration system for staybook.
//!
//! This module provides layered configuration with support for:
//! - A YAML user configuration file (`<data_dir>/config.yaml`)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`STAYBOOK_*`)
//! 3. User config (`~/.staybook/config.yaml` or `--data-dir`)
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use staybook::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! println!("holds expire after {} hours", config.hold_ttl().num_hours());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    Config, ExpiryConfig, OutputFormat, DEFAULT_HOLD_TTL_HOURS, DEFAULT_LOCK_WAIT_SECONDS,
    DEFAULT_SWEEP_INTERVAL_MINUTES,
};
pub use validator::ConfigValidator;
