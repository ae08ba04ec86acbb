//! Show command implementation.
//!
//! Prints one reservation and its invoice as `Field: value` lines.

use crate::error::CliError;
use crate::utils::{format_timestamp, open_engine, parse_reservation_id, GlobalOptions};
use clap::Args;
use staybook::ReservationId;

/// Display one reservation with its invoice.
#[derive(Args)]
pub struct ShowCommand {
    /// Reservation to display
    #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
    pub id: ReservationId,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_config, engine) = open_engine(global)?;

        let res = engine.get_reservation(self.id).map_err(CliError::from)?;

        println!("Reservation: {}", res.id());
        println!("Listing: {}", res.listing_id());
        println!("Guest: {}", res.guest_id());
        println!("Stay: {} ({} night(s))", res.stay(), res.stay().nights());
        println!("Total: {}", res.total_price());
        println!("Status: {}", res.status());
        if let Some(reason) = res.cancellation() {
            println!("Cancelled by: {reason}");
        }
        println!("Created: {}", format_timestamp(res.created_at()));
        println!("Updated: {}", format_timestamp(res.updated_at()));

        // A missing invoice is shown, not an error: reconcile-invoices repairs it
        println!();
        match engine.get_invoice(self.id) {
            Ok(invoice) => {
                println!("Invoice: {}", invoice.id());
                println!("Amount: {}", invoice.amount());
                println!("Issued: {}", format_timestamp(invoice.issued_at()));
                println!("Due: {}", invoice.due_date());
                println!("Invoice status: {}", invoice.status());
            }
            Err(e) if e.is_not_found() => println!("Invoice: none"),
            Err(e) => return Err(CliError::from(e)),
        }

        Ok(())
    }
}
