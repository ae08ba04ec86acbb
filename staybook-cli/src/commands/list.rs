//! List command implementation.
//!
//! This module implements the `list` command, which displays the
//! reservations of one guest or one listing.

use crate::error::CliError;
use crate::output::{print_rows, ReservationRow};
use crate::utils::{open_engine, parse_output_format, resolve_output_format, GlobalOptions};
use clap::Args;
use staybook::config::OutputFormat;
use staybook::{GuestId, ListingId};

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Reservations of this guest
    #[arg(
        long,
        value_name = "GUEST",
        conflicts_with = "listing",
        required_unless_present = "listing"
    )]
    pub guest: Option<String>,

    /// Reservations on this listing
    #[arg(long, value_name = "LISTING")]
    pub listing: Option<String>,

    /// Hide cancelled reservations
    #[arg(long)]
    pub active: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_name = "FORMAT", value_parser = parse_output_format)]
    pub format: Option<OutputFormat>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (config, engine) = open_engine(global)?;

        let mut reservations = match (self.guest, self.listing) {
            (Some(guest), None) => {
                let guest =
                    GuestId::new(guest).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                engine.list_reservations_for_guest(&guest)
            }
            (None, Some(listing)) => {
                let listing = ListingId::new(listing)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                engine.list_reservations_for_listing(&listing)
            }
            _ => {
                return Err(CliError::InvalidArguments(
                    "exactly one of --guest or --listing is required".into(),
                ))
            }
        }
        .map_err(CliError::from)?;

        if self.active {
            reservations.retain(|r| r.status().holds_dates());
        }

        let rows: Vec<ReservationRow> = reservations.iter().map(ReservationRow::from).collect();
        print_rows(resolve_output_format(self.format, &config), &rows)
    }
}
