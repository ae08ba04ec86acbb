//! Reserve command implementation.
//!
//! This module implements the `reserve` command, which creates a pending
//! reservation and its invoice.

use crate::error::CliError;
use crate::utils::{open_engine, parse_date, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use staybook::{GuestId, ListingId};

/// Reserve a listing for a guest.
#[derive(Args)]
pub struct ReserveCommand {
    /// Listing to book
    #[arg(long, value_name = "LISTING")]
    pub listing: String,

    /// Guest making the booking
    #[arg(long, value_name = "GUEST", env = "STAYBOOK_GUEST")]
    pub guest: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub start: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub end: NaiveDate,

    /// Confirm the reservation right away
    #[arg(long)]
    pub confirm: bool,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let listing =
            ListingId::new(self.listing).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let guest =
            GuestId::new(self.guest).map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let (_config, mut engine) = open_engine(global)?;

        let mut reservation = engine
            .create_reservation(&listing, guest, self.start, self.end)
            .map_err(CliError::from)?;

        // The id alone on stdout, for scripts; a failed confirm leaves the hold
        let id = reservation.id();
        println!("{id}");

        if self.confirm {
            reservation = engine.confirm_reservation(id).map_err(|e| {
                if !global.quiet {
                    eprintln!("Reservation {id} was created but is still pending");
                }
                CliError::from(e)
            })?;
        }

        if !global.quiet {
            eprintln!(
                "Reserved {} for {}: {} ({} night(s), total {}), {}",
                reservation.listing_id(),
                reservation.guest_id(),
                reservation.stay(),
                reservation.stay().nights(),
                reservation.total_price(),
                reservation.status()
            );
            if global.verbose {
                let invoice = engine.get_invoice(reservation.id()).map_err(CliError::from)?;
                eprintln!(
                    "Invoice {}: {} due {}",
                    invoice.id(),
                    invoice.amount(),
                    invoice.due_date()
                );
            }
        }

        Ok(())
    }
}
