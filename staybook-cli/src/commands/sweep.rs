//! Sweep command implementation.
//!
//! This module implements the `sweep` command, which cancels pending holds
//! older than the hold TTL once and exits.

use crate::error::CliError;
use crate::utils::{open_engine, GlobalOptions};
use chrono::{SubsecRound, Utc};
use clap::Args;

/// Expire stale pending reservations.
#[derive(Args)]
pub struct SweepCommand {
    /// Expire holds older than N hours instead of the configured TTL
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<u32>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_config, mut engine) = open_engine(global)?;
        if let Some(hours) = self.hours {
            engine = engine.with_hold_ttl(chrono::Duration::hours(hours.into()));
        }
        let ttl_hours = engine.hold_ttl().num_hours();

        if self.dry_run && !global.quiet {
            eprintln!("[DRY RUN] Scanning for pending holds older than {ttl_hours} hours...");
        }

        let result = engine
            .run_expiry_sweep_at(Utc::now().trunc_subsecs(0), self.dry_run)
            .map_err(CliError::from)?;

        if global.quiet {
            if result.expired_count > 0 {
                println!("{}", result.expired_count);
            }
        } else {
            if self.dry_run {
                eprintln!(
                    "[DRY RUN] Would expire {} reservation(s) older than {ttl_hours} hours",
                    result.expired_count
                );
            } else {
                eprintln!(
                    "Expired {} reservation(s) older than {ttl_hours} hours",
                    result.expired_count
                );
            }

            if global.verbose {
                for r in &result.expired_reservations {
                    eprintln!(
                        "  - {}: {} on {} ({})",
                        r.id(),
                        r.guest_id(),
                        r.listing_id(),
                        r.stay()
                    );
                }
            }
        }

        Ok(())
    }
}
