//! Date-range availability checks.
//!
//! Two stays conflict when their closed date intervals intersect: an existing
//! `[s', e']` and a candidate `[s, e]` conflict iff `s' <= e && s <= e'`.
//! Checkout and check-in on the same day therefore conflict.
//!
//! Only reservations that are not cancelled take part. Pending reservations
//! block new bookings exactly like confirmed ones; [`AvailabilityChecker::booked_ranges`]
//! is the display view and reports confirmed stays only.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{ConflictKind, Error, Result};
use crate::{GuestId, ListingId, Reservation, ReservationId, StayRange};

/// Availability queries over the reservation store.
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Returns whether `listing` is free for `stay`.
    ///
    /// `exclude` ignores one reservation, so an existing booking can be
    /// checked against everything but itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use staybook::database::{Database, DatabaseConfig};
    /// use staybook::operations::AvailabilityChecker;
    /// use staybook::{ListingId, StayRange};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
    /// let stay = StayRange::new(
    ///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    /// )
    /// .unwrap();
    /// let listing = ListingId::new("loft").unwrap();
    /// let free =
    ///     AvailabilityChecker::is_available(db.connection(), &listing, stay, None).unwrap();
    /// ```
    pub fn is_available(
        conn: &Connection,
        listing: &ListingId,
        stay: StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        Ok(Database::find_listing_overlap(conn, listing, stay, exclude)?.is_none())
    }

    /// Runs the creation-time checks: the guest's own bookings on any
    /// listing first, then the target listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] naming the failed check and the dates of
    /// the conflicting reservation, or a store error.
    pub fn check_creation(
        conn: &Connection,
        guest: &GuestId,
        listing: &ListingId,
        stay: StayRange,
    ) -> Result<()> {
        if let Some(existing) = Database::find_guest_overlap(conn, guest, stay, None)? {
            return Err(Self::conflict(ConflictKind::GuestOverlap, &existing));
        }

        if let Some(existing) = Database::find_listing_overlap(conn, listing, stay, None)? {
            return Err(Self::conflict(ConflictKind::ListingOverlap, &existing));
        }

        Ok(())
    }

    /// Returns the confirmed stays on `listing`, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn booked_ranges(conn: &Connection, listing: &ListingId) -> Result<Vec<StayRange>> {
        Ok(Database::list_confirmed_for_listing(conn, listing)?
            .iter()
            .map(Reservation::stay)
            .collect())
    }

    fn conflict(kind: ConflictKind, existing: &Reservation) -> Error {
        Error::Conflict {
            kind,
            existing_start: existing.stay().start(),
            existing_end: existing.stay().end(),
        }
    }
}
