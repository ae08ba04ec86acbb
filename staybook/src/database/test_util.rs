//! Shared test utilities for database unit tests.
//!
//! This module provides helper functions used across multiple database and
//! operations test modules.

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::{GuestId, ListingId, Reservation, StayRange};

/// Epoch seconds that [`timestamp`] offsets from.
const BASE_SECS: i64 = 1_709_251_200; // 2024-03-01T00:00:00Z

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::new(path);
    let db = Database::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// A date in 2024.
#[must_use]
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// A stay between two `(month, day)` pairs in 2024.
#[must_use]
pub fn stay(start: (u32, u32), end: (u32, u32)) -> StayRange {
    StayRange::new(date(start.0, start.1), date(end.0, end.1)).unwrap()
}

/// A whole-second timestamp `secs` after 2024-03-01T00:00:00Z.
#[must_use]
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_SECS + secs, 0).unwrap()
}

/// Creates a pending reservation priced at 100 per night, created at
/// [`timestamp`]`(0)`.
///
/// # Panics
///
/// Panics if the ids or dates are invalid.
#[must_use]
pub fn create_test_reservation(
    listing: &str,
    guest: &str,
    start: (u32, u32),
    end: (u32, u32),
) -> Reservation {
    let stay = stay(start, end);
    Reservation::builder(
        ListingId::new(listing).unwrap(),
        GuestId::new(guest).unwrap(),
        stay,
    )
    .total_price(stay.nights() * 100)
    .created_at(timestamp(0))
    .build()
    .unwrap()
}
