//! Listing command implementation.
//!
//! Listings live in an external service; the store keeps the id and nightly
//! price so reservations can be priced locally.

use crate::error::CliError;
use crate::output::{print_rows, ListingRow};
use crate::utils::{open_engine, parse_output_format, resolve_output_format, GlobalOptions};
use clap::{Args, Subcommand};
use staybook::config::OutputFormat;
use staybook::{Listing, ListingId};

/// Manage the listings known to the store.
#[derive(Args)]
pub struct ListingCommand {
    #[command(subcommand)]
    pub action: ListingAction,
}

/// Listing subcommands.
#[derive(Subcommand)]
pub enum ListingAction {
    /// Add a listing or change its nightly price
    Set {
        /// Listing id
        #[arg(value_name = "LISTING")]
        id: String,

        /// Price per night, in whole currency units
        #[arg(long, value_name = "AMOUNT")]
        price: u64,
    },

    /// List known listings
    List {
        /// Output format (table, json, csv)
        #[arg(long, value_name = "FORMAT", value_parser = parse_output_format)]
        format: Option<OutputFormat>,
    },
}

impl ListingCommand {
    /// Execute the listing command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (config, mut engine) = open_engine(global)?;

        match self.action {
            ListingAction::Set { id, price } => {
                let id = ListingId::new(id).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                engine
                    .upsert_listing(&Listing::new(id.clone(), price))
                    .map_err(CliError::from)?;
                if !global.quiet {
                    eprintln!("Listing {id} priced at {price} per night");
                }
            }
            ListingAction::List { format } => {
                let listings = engine.list_listings().map_err(CliError::from)?;
                let rows: Vec<ListingRow> = listings.iter().map(ListingRow::from).collect();
                print_rows(resolve_output_format(format, &config), &rows)?;
            }
        }

        Ok(())
    }
}
