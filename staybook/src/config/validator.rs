//! Configuration validation.

use crate::config::schema::{Config, ExpiryConfig};
use crate::error::{Error, Result};

/// Longest hold a pending reservation may be configured with (one year).
pub const MAX_HOLD_TTL_HOURS: u32 = 24 * 366;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use staybook::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns validation errors for invalid configurations.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref expiry) = config.expiry {
            Self::validate_expiry(expiry)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_expiry(expiry: &ExpiryConfig) -> Result<()> {
        if let Some(hours) = expiry.hold_ttl_hours {
            if hours == 0 {
                return Err(Error::Validation {
                    field: "expiry.hold_ttl_hours".into(),
                    message: "Hold time must be greater than 0".into(),
                });
            }
            if hours > MAX_HOLD_TTL_HOURS {
                return Err(Error::Validation {
                    field: "expiry.hold_ttl_hours".into(),
                    message: format!("Hold time cannot exceed {MAX_HOLD_TTL_HOURS} hours"),
                });
            }
        }

        if expiry.sweep_interval_minutes == Some(0) {
            return Err(Error::Validation {
                field: "expiry.sweep_interval_minutes".into(),
                message: "Sweep interval must be greater than 0".into(),
            });
        }

        Ok(())
    }
}
