//! Database operations for reservations.
//!
//! This module implements the reservation queries and the compare-and-set
//! status updates the lifecycle is built on. Every function takes a
//! `&Connection`, so it runs equally against a plain connection or inside a
//! caller's transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::{
    CancellationReason, GuestId, ListingId, Reservation, ReservationId, ReservationStatus,
    StayRange,
};

use super::connection::Database;

/// Prefixes a query tail with the reservation column list in the order
/// [`row_to_reservation`] expects.
macro_rules! reservation_select {
    ($tail:literal) => {
        concat!(
            "SELECT id, listing_id, guest_id, start_date, end_date, total_price, ",
            "status, cancellation, created_at, updated_at FROM reservations ",
            $tail
        )
    };
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar date for storage.
pub(super) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Converts a timestamp to Unix epoch seconds for database storage.
pub(super) const fn to_unix_secs(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Converts a non-negative amount to the signed integer `SQLite` stores.
///
/// # Errors
///
/// Returns a validation error if the amount does not fit in an `i64`.
pub(super) fn amount_to_sql(amount: u64, field: &str) -> Result<i64> {
    i64::try_from(amount).map_err(|_| Error::Validation {
        field: field.into(),
        message: format!("{amount} exceeds the storable range"),
    })
}

/// Wraps a parse failure of column `idx` in a rusqlite conversion error.
pub(super) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Reads a `YYYY-MM-DD` column.
pub(super) fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

/// Reads a Unix-seconds column.
pub(super) fn timestamp_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

/// Reads a non-negative integer amount column.
pub(super) fn amount_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

/// Parses a text column through `FromStr`.
pub(super) fn parsed_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion_error(idx, e))
}

/// Deserializes a reservation from a row produced by `reservation_select!`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: ReservationId = parsed_column(row, 0)?;
    let listing_id: ListingId = parsed_column(row, 1)?;
    let guest_id: GuestId = parsed_column(row, 2)?;
    let start = date_column(row, 3)?;
    let end = date_column(row, 4)?;
    let total_price = amount_column(row, 5)?;
    let status: ReservationStatus = parsed_column(row, 6)?;
    let cancellation = row
        .get::<_, Option<String>>(7)?
        .map(|text| text.parse::<CancellationReason>())
        .transpose()
        .map_err(|e| conversion_error(7, e))?;
    let created_at = timestamp_column(row, 8)?;
    let updated_at = timestamp_column(row, 9)?;

    let stay = StayRange::new(start, end).map_err(|e| conversion_error(3, e))?;

    Reservation::builder(listing_id, guest_id, stay)
        .id(id)
        .total_price(total_price)
        .status(status)
        .cancellation(cancellation)
        .created_at(created_at)
        .updated_at(updated_at)
        .build()
        .map_err(|e| conversion_error(6, e))
}

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (id, listing_id, guest_id, start_date, end_date, total_price,
     status, cancellation, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
";

const SELECT_RESERVATION: &str = reservation_select!("WHERE id = ?1");

/// Non-cancelled reservations of guest `?1` overlapping `[?2, ?3]`,
/// optionally ignoring reservation `?4`.
pub const SELECT_GUEST_OVERLAP: &str = reservation_select!(
    "WHERE guest_id = ?1 AND status != 'cancelled'
       AND start_date <= ?3 AND ?2 <= end_date
       AND id IS NOT ?4
     ORDER BY start_date LIMIT 1"
);

/// Non-cancelled reservations of listing `?1` overlapping `[?2, ?3]`,
/// optionally ignoring reservation `?4`.
pub const SELECT_LISTING_OVERLAP: &str = reservation_select!(
    "WHERE listing_id = ?1 AND status != 'cancelled'
       AND start_date <= ?3 AND ?2 <= end_date
       AND id IS NOT ?4
     ORDER BY start_date LIMIT 1"
);

const SELECT_BY_GUEST: &str =
    reservation_select!("WHERE guest_id = ?1 ORDER BY start_date, created_at");

const SELECT_BY_LISTING: &str =
    reservation_select!("WHERE listing_id = ?1 ORDER BY start_date, created_at");

const SELECT_CONFIRMED_FOR_LISTING: &str = reservation_select!(
    "WHERE listing_id = ?1 AND status = 'confirmed' ORDER BY start_date"
);

const SELECT_STALE_PENDING: &str =
    reservation_select!("WHERE status = 'pending' AND created_at < ?1 ORDER BY created_at");

// Status updates are compare-and-set: the WHERE clause names the states the
// transition may start from, so racing writers converge on one outcome.
// updated_at never drops below created_at.

const CONFIRM_PENDING: &str = r"
    UPDATE reservations
    SET status = 'confirmed', updated_at = MAX(created_at, ?2)
    WHERE id = ?1 AND status = 'pending'
";

const CANCEL_ACTIVE: &str = r"
    UPDATE reservations
    SET status = 'cancelled', cancellation = 'guest', updated_at = MAX(created_at, ?2)
    WHERE id = ?1 AND status IN ('pending', 'confirmed')
";

const EXPIRE_PENDING: &str = r"
    UPDATE reservations
    SET status = 'cancelled', cancellation = 'expired', updated_at = MAX(created_at, ?2)
    WHERE id = ?1 AND status = 'pending'
";


impl Database {
    /// Inserts a reservation row.
    ///
    /// This does not check availability; callers run the overlap queries in
    /// the same transaction first.
    ///
    /// # Errors
    ///
    /// Returns an error if the total price is out of range or the insert
    /// fails (including a duplicate id).
    pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id().to_string(),
                reservation.listing_id().as_str(),
                reservation.guest_id().as_str(),
                date_to_sql(reservation.stay().start()),
                date_to_sql(reservation.stay().end()),
                amount_to_sql(reservation.total_price(), "total_price")?,
                reservation.status().as_str(),
                reservation.cancellation().map(CancellationReason::as_str),
                to_unix_secs(reservation.created_at()),
                to_unix_secs(reservation.updated_at()),
            ],
        )?;
        Ok(())
    }

    /// Retrieves a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use staybook::database::{Database, DatabaseConfig};
    /// use staybook::ReservationId;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
    /// let found = Database::get_reservation(db.connection(), ReservationId::new()).unwrap();
    /// assert!(found.is_none());
    /// ```
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let reservation = conn
            .query_row(SELECT_RESERVATION, [id.to_string()], row_to_reservation)
            .optional()?;
        Ok(reservation)
    }

    /// Finds a non-cancelled reservation of `guest` overlapping `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_guest_overlap(
        conn: &Connection,
        guest: &GuestId,
        stay: StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Option<Reservation>> {
        Self::find_overlap(conn, SELECT_GUEST_OVERLAP, guest.as_str(), stay, exclude)
    }

    /// Finds a non-cancelled reservation on `listing` overlapping `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_listing_overlap(
        conn: &Connection,
        listing: &ListingId,
        stay: StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Option<Reservation>> {
        Self::find_overlap(conn, SELECT_LISTING_OVERLAP, listing.as_str(), stay, exclude)
    }

    fn find_overlap(
        conn: &Connection,
        query: &str,
        owner: &str,
        stay: StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Option<Reservation>> {
        let mut stmt = conn.prepare_cached(query)?;
        let found = stmt
            .query_row(
                params![
                    owner,
                    date_to_sql(stay.start()),
                    date_to_sql(stay.end()),
                    exclude.map(|id| id.to_string()),
                ],
                row_to_reservation,
            )
            .optional()?;
        Ok(found)
    }

    /// Moves a reservation from `pending` to `confirmed`.
    ///
    /// Returns `false` if the reservation does not exist or is not pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn confirm_pending(
        conn: &Connection,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(CONFIRM_PENDING, params![id.to_string(), to_unix_secs(now)])?;
        Ok(rows > 0)
    }

    /// Moves a `pending` or `confirmed` reservation to `cancelled` with
    /// reason `guest`.
    ///
    /// Returns `false` if the reservation does not exist or is already
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn cancel_active(conn: &Connection, id: ReservationId, now: DateTime<Utc>) -> Result<bool> {
        let rows = conn.execute(CANCEL_ACTIVE, params![id.to_string(), to_unix_secs(now)])?;
        Ok(rows > 0)
    }

    /// Moves a `pending` reservation to `cancelled` with reason `expired`.
    ///
    /// Returns `false` if the reservation is no longer pending, which
    /// includes a confirmation that won the race.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn expire_pending(
        conn: &Connection,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(EXPIRE_PENDING, params![id.to_string(), to_unix_secs(now)])?;
        Ok(rows > 0)
    }

    /// Lists all reservations of a guest, in any state, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_reservations_for_guest(
        conn: &Connection,
        guest: &GuestId,
    ) -> Result<Vec<Reservation>> {
        Self::query_reservations(conn, SELECT_BY_GUEST, guest.as_str())
    }

    /// Lists all reservations on a listing, in any state, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_reservations_for_listing(
        conn: &Connection,
        listing: &ListingId,
    ) -> Result<Vec<Reservation>> {
        Self::query_reservations(conn, SELECT_BY_LISTING, listing.as_str())
    }

    /// Lists confirmed reservations on a listing, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_confirmed_for_listing(
        conn: &Connection,
        listing: &ListingId,
    ) -> Result<Vec<Reservation>> {
        Self::query_reservations(conn, SELECT_CONFIRMED_FOR_LISTING, listing.as_str())
    }

    /// Finds pending reservations created strictly before `cutoff`, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn find_stale_pending(
        conn: &Connection,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(SELECT_STALE_PENDING)?;
        let reservations = stmt
            .query_map([to_unix_secs(cutoff)], row_to_reservation)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(reservations)
    }

    fn query_reservations(conn: &Connection, query: &str, key: &str) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(query)?;
        let reservations = stmt
            .query_map([key], row_to_reservation)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(reservations)
    }
}
