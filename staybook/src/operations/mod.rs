//! Booking operations.
//!
//! Each component is a set of associated functions over the store, so they
//! compose inside one transaction where an operation needs it:
//!
//! - [`AvailabilityChecker`]: date-range conflict checks
//! - [`ReservationLifecycle`]: create, confirm, cancel and expire
//! - [`InvoiceGenerator`]: one invoice per reservation, plus repair
//! - [`ExpirySweeper`]: cancels abandoned pending holds
//! - [`ExpiryScheduler`]: runs the sweep on a background thread
//!
//! [`BookingEngine`] ties them to one connection and is what callers
//! normally use.
//!
//! # Examples
//!
//! ```no_run
//! use staybook::config::ConfigBuilder;
//! use staybook::database::{resolve_database_path, Database, DatabaseConfig};
//! use staybook::operations::BookingEngine;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let db = Database::open(DatabaseConfig::new(resolve_database_path().unwrap())).unwrap();
//! let engine = BookingEngine::from_config(db, &config);
//!
//! let expired = engine.run_expiry_sweep().unwrap();
//! println!("expired {expired} holds");
//! ```

pub mod availability;
pub mod engine;
pub mod init;
pub mod invoicing;
pub mod lifecycle;
pub mod scheduler;
pub mod sweep;

#[cfg(test)]
mod proptests;

pub use availability::AvailabilityChecker;
pub use engine::BookingEngine;
pub use init::{init_database, InitOptions, InitResult};
pub use invoicing::{InvoiceGenerator, ReconcileResult};
pub use lifecycle::{CreatedReservation, ReservationLifecycle};
pub use scheduler::{ExpiryScheduler, SchedulerHandle, SchedulerOptions, SchedulerReport};
pub use sweep::{ExpirySweeper, SweepResult};
