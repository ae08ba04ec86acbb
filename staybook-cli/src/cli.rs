//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AvailabilityCommand, CancelCommand, ConfirmCommand, InitCommand, InvoiceCommand, ListCommand,
    ListingCommand, ReconcileInvoicesCommand, ReserveCommand, ShowCommand, SweepCommand,
    SweeperCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for booking short-term rentals.
#[derive(Parser)]
#[command(name = "staybook")]
#[command(version, about = "Book short-term rentals", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "STAYBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "STAYBOOK_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic store initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and store
    Init(InitCommand),

    /// Manage listings and their nightly prices
    Listing(ListingCommand),

    /// Reserve a listing for a guest
    Reserve(ReserveCommand),

    /// Confirm a pending reservation
    Confirm(ConfirmCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Display a reservation and its invoice
    Show(ShowCommand),

    /// List reservations of a guest or on a listing
    List(ListCommand),

    /// Check dates or show booked stays on a listing
    Availability(AvailabilityCommand),

    /// Show, list and update invoices
    Invoice(InvoiceCommand),

    /// Expire stale pending holds once
    Sweep(SweepCommand),

    /// Run expiry sweeps periodically in the foreground
    Sweeper(SweeperCommand),

    /// Issue invoices for reservations that have none
    ReconcileInvoices(ReconcileInvoicesCommand),
}
