#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # staybook
//!
//! A reservation engine for short-term rentals.
//!
//! Guests reserve whole-day date ranges on listings. The engine decides
//! whether a range is free, moves reservations through their lifecycle,
//! expires abandoned pending holds and issues exactly one invoice per
//! reservation. State lives in an embedded `SQLite` store.
//!
//! ## Core Types
//!
//! - [`StayRange`]: validated check-in/check-out dates
//! - [`Reservation`], [`ReservationId`] and [`ReservationStatus`]
//! - [`Invoice`] and [`InvoiceStatus`]
//! - [`Listing`] and the [`ListingDirectory`] lookup seam
//! - [`BookingEngine`]: the facade over all operations
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use staybook::StayRange;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
//! let stay = StayRange::new(d(1), d(4)).unwrap();
//! assert_eq!(stay.nights(), 3);
//!
//! // Check-out and check-in on the same day collide
//! let next = StayRange::new(d(4), d(6)).unwrap();
//! assert!(stay.overlaps(&next));
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod invoice;
pub mod listing;
pub mod logging;
pub mod operations;
pub mod reservation;
pub mod stay;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{ConflictKind, Error, Result};
pub use invoice::{Invoice, InvoiceId, InvoiceStatus};
pub use listing::{Listing, ListingDirectory};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    AvailabilityChecker, BookingEngine, CreatedReservation, ExpiryScheduler, ExpirySweeper,
    InvoiceGenerator, ReconcileResult, ReservationLifecycle, SchedulerHandle, SchedulerOptions,
    SweepResult,
};
pub use reservation::{
    CancellationReason, GuestId, ListingId, Reservation, ReservationBuilder, ReservationId,
    ReservationStatus,
};
pub use stay::{InvalidStayRangeError, StayRange};
