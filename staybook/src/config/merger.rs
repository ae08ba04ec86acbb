//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, ExpiryConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use staybook::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(30), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(30));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Simple fields are overwritten when set in `source`; the expiry section
    /// merges field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_expiry) = source.expiry {
            target.expiry = Some(match &target.expiry {
                Some(target_expiry) => Self::merge_expiry(target_expiry, source_expiry),
                None => source_expiry.clone(),
            });
        }
    }

    fn merge_expiry(target: &ExpiryConfig, source: &ExpiryConfig) -> ExpiryConfig {
        ExpiryConfig {
            hold_ttl_hours: source.hold_ttl_hours.or(target.hold_ttl_hours),
            sweep_interval_minutes: source
                .sweep_interval_minutes
                .or(target.sweep_interval_minutes),
        }
    }
}
