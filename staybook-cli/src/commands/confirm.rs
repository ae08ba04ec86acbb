//! Confirm command implementation.

use crate::error::CliError;
use crate::utils::{open_engine, parse_reservation_id, GlobalOptions};
use clap::Args;
use staybook::ReservationId;

/// Confirm a pending reservation.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Reservation to confirm
    #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
    pub id: ReservationId,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_config, mut engine) = open_engine(global)?;

        let reservation = engine.confirm_reservation(self.id).map_err(CliError::from)?;

        if !global.quiet {
            eprintln!(
                "Confirmed {} ({} on {})",
                reservation.id(),
                reservation.listing_id(),
                reservation.stay()
            );
        }

        Ok(())
    }
}
