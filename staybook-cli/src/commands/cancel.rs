//! Cancel command implementation.

use crate::error::CliError;
use crate::utils::{open_engine, parse_reservation_id, GlobalOptions};
use clap::Args;
use staybook::{CancellationReason, ReservationId};

/// Cancel a reservation.
///
/// Cancelling an already cancelled reservation succeeds and changes nothing.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation to cancel
    #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
    pub id: ReservationId,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_config, mut engine) = open_engine(global)?;

        let reservation = engine.cancel_reservation(self.id).map_err(CliError::from)?;

        if !global.quiet {
            match reservation.cancellation() {
                Some(CancellationReason::Expired) => {
                    eprintln!("Reservation {} had already expired", reservation.id());
                }
                _ => eprintln!("Cancelled {}", reservation.id()),
            }
        }

        Ok(())
    }
}
