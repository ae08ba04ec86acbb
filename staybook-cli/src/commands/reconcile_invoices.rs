//! Reconcile-invoices command implementation.

use crate::error::CliError;
use crate::utils::{open_engine, GlobalOptions};
use clap::Args;

/// Issue invoices for reservations that have none.
#[derive(Args)]
pub struct ReconcileInvoicesCommand {}

impl ReconcileInvoicesCommand {
    /// Execute the reconcile-invoices command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_config, mut engine) = open_engine(global)?;

        let result = engine.reconcile_invoices().map_err(CliError::from)?;

        if global.quiet {
            if result.issued_count > 0 {
                println!("{}", result.issued_count);
            }
            return Ok(());
        }

        eprintln!("Issued {} missing invoice(s)", result.issued_count);
        if global.verbose {
            for invoice in &result.issued_invoices {
                eprintln!(
                    "  - {} for reservation {}: {}",
                    invoice.id(),
                    invoice.reservation_id(),
                    invoice.amount()
                );
            }
        }

        Ok(())
    }
}
