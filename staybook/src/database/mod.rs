//! Database layer for persistent storage of reservations and invoices.
//!
//! This module provides a SQLite-based storage layer, including connection
//! management, schema versioning, the named overlap queries and the
//! compare-and-set status updates.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::{NaiveDate, Utc};
//! use staybook::database::{Database, DatabaseConfig};
//! use staybook::{GuestId, ListingId, Reservation, StayRange};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
//!
//! let stay = StayRange::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
//! )
//! .unwrap();
//! let reservation = Reservation::builder(
//!     ListingId::new("loft").unwrap(),
//!     GuestId::new("ana").unwrap(),
//!     stay,
//! )
//! .total_price(300)
//! .build()
//! .unwrap();
//!
//! db.immediate(|tx| Database::insert_reservation(tx, &reservation)).unwrap();
//!
//! let guest = GuestId::new("ana").unwrap();
//! for r in Database::list_reservations_for_guest(db.connection(), &guest).unwrap() {
//!     println!("{} {}", r.id(), r.stay());
//! }
//! ```

mod config;
mod connection;
mod invoices;
mod listings;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::{SELECT_GUEST_OVERLAP, SELECT_LISTING_OVERLAP};

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
