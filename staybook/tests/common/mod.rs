//! Common test utilities for integration tests.
//!
//! Stores live in temporary directories; [`TestStore`] keeps the directory
//! alive for as long as the test holds it, so several connections can be
//! opened on the same file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;

use staybook::database::{Database, DatabaseConfig};
use staybook::{BookingEngine, GuestId, Listing, ListingId};

/// Nightly price of the listings created by [`TestStore::engine`].
#[allow(dead_code)]
pub const NIGHTLY_PRICE: u64 = 100;

/// A store file in a temporary directory.
pub struct TestStore {
    dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl TestStore {
    /// Creates the directory and initializes the store schema.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staybook.db");
        Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { dir, path }
    }

    /// The data directory holding the store.
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// The store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration for a new connection.
    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.path)
    }

    /// Opens another connection.
    pub fn open(&self) -> Database {
        Database::open(self.config()).unwrap()
    }

    /// Opens an engine with the listings `loft`, `cabin` and `barn`, all at
    /// [`NIGHTLY_PRICE`].
    pub fn engine(&self) -> BookingEngine {
        let mut engine = BookingEngine::new(self.open());
        for id in ["loft", "cabin", "barn"] {
            engine
                .upsert_listing(&Listing::new(listing(id), NIGHTLY_PRICE))
                .unwrap();
        }
        engine
    }
}

/// A date in 2024.
#[allow(dead_code)]
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// A whole-second timestamp `secs` after 2024-03-01T00:00:00Z.
#[allow(dead_code)]
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_251_200 + secs, 0).unwrap()
}

#[allow(dead_code)]
pub fn listing(id: &str) -> ListingId {
    ListingId::new(id).unwrap()
}

#[allow(dead_code)]
pub fn guest(id: &str) -> GuestId {
    GuestId::new(id).unwrap()
}
