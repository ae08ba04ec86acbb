//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and store
//! - `listing`: Add, reprice and list listings
//! - `reserve`: Create a pending reservation and its invoice
//! - `confirm`: Confirm a pending reservation
//! - `cancel`: Cancel a reservation
//! - `show`: Show one reservation with its invoice
//! - `list`: List reservations by guest or listing
//! - `availability`: Check dates or show booked ranges for a listing
//! - `invoice`: Show, list and update invoices
//! - `sweep`: Expire stale pending holds once
//! - `sweeper`: Run the expiry scheduler in the foreground
//! - `reconcile_invoices`: Issue missing invoices

pub mod availability;
pub mod cancel;
pub mod confirm;
pub mod init;
pub mod invoice;
pub mod list;
pub mod listing;
pub mod reconcile_invoices;
pub mod reserve;
pub mod show;
pub mod sweep;
pub mod sweeper;

pub use availability::AvailabilityCommand;
pub use cancel::CancelCommand;
pub use confirm::ConfirmCommand;
pub use init::InitCommand;
pub use invoice::InvoiceCommand;
pub use list::ListCommand;
pub use listing::ListingCommand;
pub use reconcile_invoices::ReconcileInvoicesCommand;
pub use reserve::ReserveCommand;
pub use show::ShowCommand;
pub use sweep::SweepCommand;
pub use sweeper::SweeperCommand;
