//! Reservation state machine.
//!
//! ```text
//! pending ──confirm──▶ confirmed
//!    │                     │
//!    └──cancel / expire──▶ cancelled ◀──cancel──┘
//! ```
//!
//! Creation validates, prices, checks availability and writes the
//! reservation with its invoice in one IMMEDIATE transaction. Status changes
//! are decided by [`ReservationStatus::can_transition_to`] on the row read
//! inside the transaction, then applied as compare-and-set updates.

use chrono::{DateTime, SubsecRound, Utc};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::operations::availability::AvailabilityChecker;
use crate::operations::invoicing::InvoiceGenerator;
use crate::{
    GuestId, Invoice, Listing, ListingDirectory, ListingId, Reservation, ReservationId,
    ReservationStatus, StayRange,
};

/// A reservation created together with its invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReservation {
    /// The new pending reservation.
    pub reservation: Reservation,
    /// Its invoice.
    pub invoice: Invoice,
}

/// Lifecycle transitions for reservations.
pub struct ReservationLifecycle;

impl ReservationLifecycle {
    /// Looks up the listing a reservation is being made for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListingNotFound`] if the directory does not know the
    /// listing, or the directory's own error.
    pub fn resolve_listing<D>(directory: &D, listing: &ListingId) -> Result<Listing>
    where
        D: ListingDirectory + ?Sized,
    {
        directory
            .get_listing(listing)?
            .ok_or_else(|| Error::ListingNotFound {
                listing: listing.to_string(),
            })
    }

    /// Prices a stay: nights times the nightly price.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the total overflows.
    pub fn total_price(listing: &Listing, stay: StayRange) -> Result<u64> {
        listing
            .nightly_price
            .checked_mul(stay.nights())
            .ok_or_else(|| Error::Validation {
                field: "total_price".into(),
                message: format!(
                    "{} nights at {} overflows the total",
                    stay.nights(),
                    listing.nightly_price
                ),
            })
    }

    /// Creates a pending reservation for `guest` on an already resolved
    /// listing, and issues its invoice.
    ///
    /// Nothing is written unless both overlap checks pass and both inserts
    /// succeed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the guest or the listing is already
    /// booked for overlapping dates, [`Error::StoreUnavailable`] if the store
    /// stayed locked past the busy timeout, or another store error.
    pub fn create(
        db: &mut Database,
        listing: &Listing,
        guest: GuestId,
        stay: StayRange,
        now: DateTime<Utc>,
    ) -> Result<CreatedReservation> {
        // The store keeps whole seconds
        let now = now.trunc_subsecs(0);
        let total_price = Self::total_price(listing, stay)?;
        let reservation = Reservation::builder(listing.id.clone(), guest, stay)
            .total_price(total_price)
            .created_at(now)
            .build()?;

        let invoice = db.immediate(|tx| {
            AvailabilityChecker::check_creation(
                tx,
                reservation.guest_id(),
                reservation.listing_id(),
                stay,
            )?;
            Database::insert_reservation(tx, &reservation)?;
            InvoiceGenerator::create(tx, &reservation, now)
        })?;

        log::debug!(
            "reservation {} created for {} on {} ({stay})",
            reservation.id(),
            reservation.guest_id(),
            reservation.listing_id()
        );

        Ok(CreatedReservation {
            reservation,
            invoice,
        })
    }

    /// Confirms a pending reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and
    /// [`Error::InvalidTransition`] if the reservation is not pending.
    pub fn confirm(
        db: &mut Database,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<Reservation> {
        db.immediate(|tx| {
            let current = Self::load(tx, id)?;
            if !current.status().can_transition_to(ReservationStatus::Confirmed)
                || !Database::confirm_pending(tx, id, now)?
            {
                return Err(Self::invalid(id, "confirm", current.status()));
            }
            log::debug!("reservation {id} confirmed");
            Self::load(tx, id)
        })
    }

    /// Cancels a pending or confirmed reservation on the guest's behalf.
    ///
    /// Cancelling an already cancelled reservation succeeds and returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn cancel(
        db: &mut Database,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<Reservation> {
        db.immediate(|tx| {
            let current = Self::load(tx, id)?;
            if current.status() == ReservationStatus::Cancelled {
                return Ok(current);
            }
            if !current.status().can_transition_to(ReservationStatus::Cancelled)
                || !Database::cancel_active(tx, id, now)?
            {
                return Err(Self::invalid(id, "cancel", current.status()));
            }
            log::debug!("reservation {id} cancelled");
            Self::load(tx, id)
        })
    }

    /// Expires a pending reservation. Returns `false`, changing nothing, if
    /// it is no longer pending.
    ///
    /// Only the expiry sweep calls this.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn expire(db: &Database, id: ReservationId, now: DateTime<Utc>) -> Result<bool> {
        let expired = Database::expire_pending(db.connection(), id, now)?;
        if expired {
            log::debug!("reservation {id} expired");
        }
        Ok(expired)
    }

    const fn invalid(
        reservation: ReservationId,
        action: &'static str,
        current: ReservationStatus,
    ) -> Error {
        Error::InvalidTransition {
            reservation,
            action,
            current,
        }
    }

    fn load(conn: &rusqlite::Connection, id: ReservationId) -> Result<Reservation> {
        Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, stay, timestamp};
    use crate::error::ConflictKind;
    use crate::listing::MockListingDirectory;
    use crate::CancellationReason;
    use mockall::predicate::eq;

    fn loft() -> Listing {
        Listing::new(ListingId::new("loft").unwrap(), 100)
    }

    fn guest(id: &str) -> GuestId {
        GuestId::new(id).unwrap()
    }

    fn book(
        db: &mut Database,
        who: &str,
        start: (u32, u32),
        end: (u32, u32),
        secs: i64,
    ) -> Result<CreatedReservation> {
        ReservationLifecycle::create(db, &loft(), guest(who), stay(start, end), timestamp(secs))
    }

    #[test]
    fn test_resolve_listing_found() {
        let mut directory = MockListingDirectory::new();
        directory
            .expect_get_listing()
            .with(eq(ListingId::new("loft").unwrap()))
            .times(1)
            .returning(|_| Ok(Some(loft())));

        let listing =
            ReservationLifecycle::resolve_listing(&directory, &ListingId::new("loft").unwrap())
                .unwrap();
        assert_eq!(listing.nightly_price, 100);
    }

    #[test]
    fn test_resolve_listing_missing() {
        let mut directory = MockListingDirectory::new();
        directory.expect_get_listing().returning(|_| Ok(None));

        let err =
            ReservationLifecycle::resolve_listing(&directory, &ListingId::new("ghost").unwrap())
                .unwrap_err();
        assert!(matches!(err, Error::ListingNotFound { ref listing } if listing == "ghost"));
    }

    #[test]
    fn test_resolve_listing_propagates_lookup_failure() {
        let mut directory = MockListingDirectory::new();
        directory.expect_get_listing().returning(|_| {
            Err(Error::StoreUnavailable {
                reason: "listing service timed out".into(),
            })
        });

        let err =
            ReservationLifecycle::resolve_listing(&directory, &ListingId::new("loft").unwrap())
                .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_total_price() {
        assert_eq!(ReservationLifecycle::total_price(&loft(), stay((3, 1), (3, 4))).unwrap(), 300);

        let pricey = Listing::new(ListingId::new("palace").unwrap(), u64::MAX);
        assert!(ReservationLifecycle::total_price(&pricey, stay((3, 1), (3, 4))).is_err());
    }

    #[test]
    fn test_create_writes_reservation_and_invoice() {
        let mut db = create_test_database();
        let created = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();

        assert_eq!(created.reservation.status(), ReservationStatus::Pending);
        assert_eq!(created.reservation.total_price(), 300);
        assert_eq!(created.invoice.amount(), 300);
        assert_eq!(created.invoice.reservation_id(), created.reservation.id());

        let stored = Database::get_reservation(db.connection(), created.reservation.id())
            .unwrap()
            .unwrap();
        assert_eq!(stored, created.reservation);
    }

    #[test]
    fn test_create_stores_whole_seconds() {
        let mut db = create_test_database();
        let now = timestamp(0) + chrono::Duration::milliseconds(500);

        let created =
            ReservationLifecycle::create(&mut db, &loft(), guest("ana"), stay((3, 1), (3, 4)), now)
                .unwrap();
        assert_eq!(created.reservation.created_at(), timestamp(0));

        let stored = Database::get_reservation(db.connection(), created.reservation.id())
            .unwrap()
            .unwrap();
        assert_eq!(stored, created.reservation);

        let invoice = Database::get_invoice_for_reservation(db.connection(), stored.id())
            .unwrap()
            .unwrap();
        assert_eq!(invoice, created.invoice);
    }

    #[test]
    fn test_transitions_follow_status_table() {
        use ReservationStatus::{Cancelled, Confirmed, Pending};

        for from in [Pending, Confirmed, Cancelled] {
            let mut db = create_test_database();
            let cancellation = (from == Cancelled).then_some(CancellationReason::Guest);
            let reservation = Reservation::builder(
                ListingId::new("loft").unwrap(),
                guest("ana"),
                stay((3, 1), (3, 4)),
            )
            .total_price(300)
            .status(from)
            .cancellation(cancellation)
            .created_at(timestamp(0))
            .build()
            .unwrap();
            Database::insert_reservation(db.connection(), &reservation).unwrap();
            let id = reservation.id();

            let confirmed = ReservationLifecycle::confirm(&mut db, id, timestamp(1));
            assert_eq!(confirmed.is_ok(), from.can_transition_to(Confirmed), "confirm from {from}");
            if let Err(err) = confirmed {
                assert!(matches!(err, Error::InvalidTransition { current, .. } if current == from));
            }

            let cancelled = ReservationLifecycle::cancel(&mut db, id, timestamp(2)).unwrap();
            assert_eq!(cancelled.status(), Cancelled);
            assert!(!cancelled.status().holds_dates());
        }
    }

    #[test]
    fn test_create_conflict_writes_nothing() {
        let mut db = create_test_database();
        book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();

        let err = book(&mut db, "ben", (3, 4), (3, 6), 1).unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                kind: ConflictKind::ListingOverlap,
                ..
            }
        ));

        let ben = Database::list_reservations_for_guest(db.connection(), &guest("ben")).unwrap();
        assert!(ben.is_empty());
        assert!(Database::find_uninvoiced_reservations(db.connection())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_confirm_then_confirm_again() {
        let mut db = create_test_database();
        let created = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();
        let id = created.reservation.id();

        let confirmed = ReservationLifecycle::confirm(&mut db, id, timestamp(10)).unwrap();
        assert_eq!(confirmed.status(), ReservationStatus::Confirmed);

        let err = ReservationLifecycle::confirm(&mut db, id, timestamp(20)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                current: ReservationStatus::Confirmed,
                ..
            }
        ));
    }

    #[test]
    fn test_confirm_cancelled_is_invalid() {
        let mut db = create_test_database();
        let created = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();
        let id = created.reservation.id();
        ReservationLifecycle::cancel(&mut db, id, timestamp(5)).unwrap();

        let err = ReservationLifecycle::confirm(&mut db, id, timestamp(10)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                action: "confirm",
                current: ReservationStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut db = create_test_database();
        let id = ReservationId::new();
        assert!(ReservationLifecycle::confirm(&mut db, id, timestamp(0))
            .unwrap_err()
            .is_not_found());
        assert!(ReservationLifecycle::cancel(&mut db, id, timestamp(0))
            .unwrap_err()
            .is_not_found());
        assert!(!ReservationLifecycle::expire(&db, id, timestamp(0)).unwrap());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut db = create_test_database();
        let created = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();
        let id = created.reservation.id();
        ReservationLifecycle::confirm(&mut db, id, timestamp(5)).unwrap();

        let first = ReservationLifecycle::cancel(&mut db, id, timestamp(10)).unwrap();
        assert_eq!(first.status(), ReservationStatus::Cancelled);
        assert_eq!(first.cancellation(), Some(CancellationReason::Guest));

        let second = ReservationLifecycle::cancel(&mut db, id, timestamp(20)).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_expire_only_pending() {
        let mut db = create_test_database();
        let pending = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();
        let confirmed = book(&mut db, "ben", (3, 10), (3, 12), 0).unwrap();
        ReservationLifecycle::confirm(&mut db, confirmed.reservation.id(), timestamp(1)).unwrap();

        let (held, booked) = (pending.reservation.id(), confirmed.reservation.id());
        assert!(ReservationLifecycle::expire(&db, held, timestamp(2)).unwrap());
        assert!(!ReservationLifecycle::expire(&db, held, timestamp(3)).unwrap());
        assert!(!ReservationLifecycle::expire(&db, booked, timestamp(3)).unwrap());

        let expired = Database::get_reservation(db.connection(), pending.reservation.id())
            .unwrap()
            .unwrap();
        assert_eq!(expired.cancellation(), Some(CancellationReason::Expired));
    }

    #[test]
    fn test_expired_then_cancel_is_noop_success() {
        let mut db = create_test_database();
        let created = book(&mut db, "ana", (3, 1), (3, 4), 0).unwrap();
        let id = created.reservation.id();
        ReservationLifecycle::expire(&db, id, timestamp(1)).unwrap();

        let result = ReservationLifecycle::cancel(&mut db, id, timestamp(2)).unwrap();
        assert_eq!(result.cancellation(), Some(CancellationReason::Expired));
    }
}
