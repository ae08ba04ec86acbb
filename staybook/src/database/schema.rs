//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions and indices for the
//! staybook reservation store.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the listings table.
///
/// Only the pricing slice of a listing lives here; everything else about a
/// listing belongs to the listing service.
pub const CREATE_LISTINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS listings (
        id TEXT PRIMARY KEY NOT NULL,
        nightly_price INTEGER NOT NULL CHECK (nightly_price >= 0),
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// Dates are stored as ISO-8601 `YYYY-MM-DD` text, which orders the same
/// way lexically as chronologically, so range comparisons work in SQL.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        listing_id TEXT NOT NULL,
        guest_id TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        total_price INTEGER NOT NULL CHECK (total_price >= 0),
        status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed', 'cancelled')),
        cancellation TEXT CHECK (cancellation IN ('guest', 'expired')),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (end_date > start_date)
    )";

/// SQL statement to create the invoices table.
///
/// The UNIQUE constraint on `reservation_id` enforces one invoice per
/// reservation; invoices are removed together with their reservation.
pub const CREATE_INVOICES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY NOT NULL,
        reservation_id TEXT NOT NULL UNIQUE
            REFERENCES reservations(id) ON DELETE CASCADE,
        guest_id TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK (amount >= 0),
        issued_at INTEGER NOT NULL,
        due_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'paid', 'overdue'))
    )";

/// Index serving the listing overlap check and listing queries.
pub const CREATE_LISTING_OVERLAP_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_listing
    ON reservations(listing_id, status, start_date, end_date)";

/// Index serving the guest overlap check and guest queries.
pub const CREATE_GUEST_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_guest ON reservations(guest_id, status)";

/// Index serving the expiry sweep.
pub const CREATE_PENDING_AGE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status_created \
     ON reservations(status, created_at)";

/// Index serving the per-guest invoice listing.
pub const CREATE_INVOICE_GUEST_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_invoices_guest ON invoices(guest_id, issued_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
