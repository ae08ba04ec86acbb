//! Availability command implementation.
//!
//! With `--start` and `--end`, reports whether the dates are free and exits
//! with code 1 when they are not. Without dates, prints the confirmed stays
//! on the listing.

use crate::error::CliError;
use crate::utils::{open_engine, parse_date, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use staybook::ListingId;

/// Check whether a listing is free, or show its booked stays.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// Listing to check
    #[arg(value_name = "LISTING")]
    pub listing: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "start")]
    pub end: Option<NaiveDate>,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let listing =
            ListingId::new(self.listing).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let (_config, engine) = open_engine(global)?;

        if let (Some(start), Some(end)) = (self.start, self.end) {
            let free = engine
                .is_available(&listing, start, end, None)
                .map_err(CliError::from)?;
            if free {
                if !global.quiet {
                    println!("{listing} is available from {start} to {end}");
                }
                return Ok(());
            }
            return Err(CliError::SemanticFailure(format!(
                "{listing} is not available from {start} to {end}"
            )));
        }

        let ranges = engine.booked_ranges(&listing).map_err(CliError::from)?;
        if ranges.is_empty() && !global.quiet {
            eprintln!("No confirmed stays on {listing}");
        }
        for range in ranges {
            println!("{}\t{}", range.start(), range.end());
        }

        Ok(())
    }
}
