//! Invoice command implementation.
//!
//! Invoices are created with their reservation; these subcommands read them,
//! record payment state and issue one that is missing.

use crate::error::CliError;
use crate::output::{print_rows, InvoiceRow};
use crate::utils::{
    open_engine, parse_output_format, parse_reservation_id, resolve_output_format, GlobalOptions,
};
use clap::{Args, Subcommand};
use staybook::config::OutputFormat;
use staybook::{GuestId, InvoiceStatus, ReservationId};

fn parse_invoice_status(s: &str) -> Result<InvoiceStatus, String> {
    s.parse::<InvoiceStatus>().map_err(|e| e.to_string())
}

/// Show, list and update invoices.
#[derive(Args)]
pub struct InvoiceCommand {
    #[command(subcommand)]
    pub action: InvoiceAction,
}

/// Invoice subcommands.
#[derive(Subcommand)]
pub enum InvoiceAction {
    /// Show the invoice of a reservation
    Show {
        /// Reservation the invoice belongs to
        #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
        reservation: ReservationId,

        /// Output format (table, json, csv)
        #[arg(long, value_name = "FORMAT", value_parser = parse_output_format)]
        format: Option<OutputFormat>,
    },

    /// List a guest's invoices, newest first
    List {
        /// Guest whose invoices to list
        #[arg(long, value_name = "GUEST")]
        guest: String,

        /// Output format (table, json, csv)
        #[arg(long, value_name = "FORMAT", value_parser = parse_output_format)]
        format: Option<OutputFormat>,
    },

    /// Record a payment status (pending, paid, overdue)
    SetStatus {
        /// Reservation the invoice belongs to
        #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
        reservation: ReservationId,

        /// New status
        #[arg(value_name = "STATUS", value_parser = parse_invoice_status)]
        status: InvoiceStatus,
    },

    /// Issue the invoice of a reservation that has none
    Issue {
        /// Reservation to invoice
        #[arg(value_name = "RESERVATION", value_parser = parse_reservation_id)]
        reservation: ReservationId,
    },
}

impl InvoiceCommand {
    /// Execute the invoice command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (config, mut engine) = open_engine(global)?;

        match self.action {
            InvoiceAction::Show {
                reservation,
                format,
            } => {
                let invoice = engine.get_invoice(reservation).map_err(CliError::from)?;
                print_rows(
                    resolve_output_format(format, &config),
                    &[InvoiceRow::from(&invoice)],
                )?;
            }
            InvoiceAction::List { guest, format } => {
                let guest =
                    GuestId::new(guest).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                let invoices = engine
                    .list_invoices_for_guest(&guest)
                    .map_err(CliError::from)?;
                let rows: Vec<InvoiceRow> = invoices.iter().map(InvoiceRow::from).collect();
                print_rows(resolve_output_format(format, &config), &rows)?;
            }
            InvoiceAction::SetStatus {
                reservation,
                status,
            } => {
                let invoice = engine
                    .set_invoice_status(reservation, status)
                    .map_err(CliError::from)?;
                if !global.quiet {
                    eprintln!("Invoice {} is now {}", invoice.id(), invoice.status());
                }
            }
            InvoiceAction::Issue { reservation } => {
                let invoice = engine.issue_invoice(reservation).map_err(CliError::from)?;
                println!("{}", invoice.id());
                if !global.quiet {
                    eprintln!(
                        "Issued invoice for {}: {} due {}",
                        reservation,
                        invoice.amount(),
                        invoice.due_date()
                    );
                }
            }
        }

        Ok(())
    }
}
