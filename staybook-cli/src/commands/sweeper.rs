//! Sweeper command implementation.
//!
//! Runs the expiry scheduler in the foreground. With `--ticks` it stops
//! after that many sweeps; otherwise it runs until the process is killed.

use crate::error::CliError;
use crate::utils::{database_config, load_configuration, GlobalOptions};
use clap::Args;
use staybook::operations::{ExpiryScheduler, SchedulerOptions};
use std::time::Duration;

/// Run periodic expiry sweeps.
#[derive(Args)]
pub struct SweeperCommand {
    /// Stop after N sweeps
    #[arg(long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Seconds between sweeps instead of the configured interval
    #[arg(long, value_name = "SECONDS")]
    pub interval_seconds: Option<u64>,
}

impl SweeperCommand {
    /// Execute the sweeper command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db_config = database_config(global, &config)?;

        let mut options = SchedulerOptions::from_config(&config).with_max_ticks(self.ticks);
        if let Some(secs) = self.interval_seconds {
            options.interval = Duration::from_secs(secs);
        }

        if !global.quiet {
            eprintln!(
                "Sweeping every {}s, expiring holds older than {} hours",
                options.interval.as_secs(),
                options.hold_ttl.num_hours()
            );
        }

        let handle = ExpiryScheduler::spawn(db_config, options).map_err(CliError::from)?;
        let report = handle.join();

        if !global.quiet {
            eprintln!(
                "Ran {} sweep(s), expired {} reservation(s), {} failure(s)",
                report.ticks, report.expired, report.failures
            );
        }

        if report.failures > 0 && report.failures == report.ticks {
            return Err(CliError::SemanticFailure("every sweep failed".into()));
        }

        Ok(())
    }
}
