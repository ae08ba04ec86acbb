//! Listing pricing storage.
//!
//! The store keeps a minimal `listings` table so that the shipped binary has
//! a [`ListingDirectory`] to book against.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::{Listing, ListingDirectory, ListingId};

use super::connection::Database;
use super::operations::{amount_column, amount_to_sql, parsed_column, to_unix_secs};

const UPSERT_LISTING: &str = r"
    INSERT INTO listings (id, nightly_price, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(id) DO UPDATE SET
        nightly_price = excluded.nightly_price,
        updated_at = excluded.updated_at
";

const SELECT_LISTING: &str = "SELECT id, nightly_price FROM listings WHERE id = ?1";

const LIST_LISTINGS: &str = "SELECT id, nightly_price FROM listings ORDER BY id";

fn row_to_listing(row: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    let id: ListingId = parsed_column(row, 0)?;
    let nightly_price = amount_column(row, 1)?;
    Ok(Listing::new(id, nightly_price))
}

impl Database {
    /// Creates a listing or replaces its nightly price.
    ///
    /// Existing reservations keep the total they were created with.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is out of range or the write fails.
    pub fn upsert_listing(conn: &Connection, listing: &Listing, now: DateTime<Utc>) -> Result<()> {
        conn.execute(
            UPSERT_LISTING,
            params![
                listing.id.as_str(),
                amount_to_sql(listing.nightly_price, "nightly_price")?,
                to_unix_secs(now),
            ],
        )?;
        Ok(())
    }

    /// Retrieves a listing by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn find_listing(conn: &Connection, id: &ListingId) -> Result<Option<Listing>> {
        let listing = conn
            .query_row(SELECT_LISTING, [id.as_str()], row_to_listing)
            .optional()?;
        Ok(listing)
    }

    /// Lists all stored listings by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_listings(conn: &Connection) -> Result<Vec<Listing>> {
        let mut stmt = conn.prepare(LIST_LISTINGS)?;
        let listings = stmt
            .query_map([], row_to_listing)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(listings)
    }
}

impl ListingDirectory for Database {
    fn get_listing(&self, id: &ListingId) -> Result<Option<Listing>> {
        Self::find_listing(self.connection(), id)
    }
}
