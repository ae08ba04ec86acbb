//! The booking facade.
//!
//! [`BookingEngine`] binds the availability checks, the reservation
//! lifecycle, invoicing and the expiry sweep to one store connection. Each
//! call runs to completion on its own; the store is the only shared state.
//!
//! Listings are resolved through the store's `listings` table unless an
//! external [`ListingDirectory`] is attached with
//! [`BookingEngine::with_directory`].

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};

use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::operations::availability::AvailabilityChecker;
use crate::operations::invoicing::{InvoiceGenerator, ReconcileResult};
use crate::operations::lifecycle::{CreatedReservation, ReservationLifecycle};
use crate::operations::sweep::{ExpirySweeper, SweepResult};
use crate::{
    GuestId, Invoice, InvoiceStatus, Listing, ListingDirectory, ListingId, Reservation,
    ReservationId, StayRange,
};

/// Entry point for booking operations.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use staybook::database::{Database, DatabaseConfig};
/// use staybook::operations::BookingEngine;
/// use staybook::{GuestId, Listing, ListingId};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
/// let mut engine = BookingEngine::new(db);
///
/// let loft = ListingId::new("loft").unwrap();
/// engine.upsert_listing(&Listing::new(loft.clone(), 100)).unwrap();
///
/// let reservation = engine
///     .create_reservation(
///         &loft,
///         GuestId::new("ana").unwrap(),
///         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     )
///     .unwrap();
/// assert_eq!(reservation.total_price(), 300);
///
/// engine.confirm_reservation(reservation.id()).unwrap();
/// ```
pub struct BookingEngine {
    db: Database,
    directory: Option<Box<dyn ListingDirectory + Send>>,
    hold_ttl: Duration,
}

impl BookingEngine {
    /// Creates an engine over `db` with the default 24 hour hold TTL.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            directory: None,
            hold_ttl: Duration::hours(i64::from(crate::config::DEFAULT_HOLD_TTL_HOURS)),
        }
    }

    /// Creates an engine taking its hold TTL from `config`.
    #[must_use]
    pub fn from_config(db: Database, config: &Config) -> Self {
        Self::new(db).with_hold_ttl(config.hold_ttl())
    }

    /// Resolves listings through `directory` instead of the store.
    #[must_use]
    pub fn with_directory(mut self, directory: impl ListingDirectory + Send + 'static) -> Self {
        self.directory = Some(Box::new(directory));
        self
    }

    /// Sets the age after which the sweep expires a pending hold.
    #[must_use]
    pub fn with_hold_ttl(mut self, hold_ttl: Duration) -> Self {
        self.hold_ttl = hold_ttl;
        self
    }

    /// Returns the hold TTL.
    #[must_use]
    pub const fn hold_ttl(&self) -> Duration {
        self.hold_ttl
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }

    fn resolve_listing(&self, listing: &ListingId) -> Result<Listing> {
        match &self.directory {
            Some(directory) => ReservationLifecycle::resolve_listing(directory.as_ref(), listing),
            None => ReservationLifecycle::resolve_listing(&self.db, listing),
        }
    }

    // Reservations

    /// Creates a pending reservation and its invoice.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`] if `end` is not after `start`
    /// - [`Error::ListingNotFound`] if the listing does not resolve
    /// - [`Error::Conflict`] if the guest or the listing is already booked
    ///   on overlapping dates
    /// - [`Error::StoreUnavailable`] if the store stayed locked
    pub fn create_reservation(
        &mut self,
        listing: &ListingId,
        guest: GuestId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Reservation> {
        self.create_reservation_at(listing, guest, start, end, Self::now())
            .map(|created| created.reservation)
    }

    /// Creates a pending reservation and its invoice, stamped with `now`.
    ///
    /// # Errors
    ///
    /// As [`BookingEngine::create_reservation`].
    pub fn create_reservation_at(
        &mut self,
        listing: &ListingId,
        guest: GuestId,
        start: NaiveDate,
        end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CreatedReservation> {
        let stay = StayRange::new(start, end)?;
        let listing = self.resolve_listing(listing)?;
        ReservationLifecycle::create(&mut self.db, &listing, guest, stay, now)
    }

    /// Confirms a pending reservation.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, [`Error::InvalidTransition`]
    /// if the reservation is not pending.
    pub fn confirm_reservation(&mut self, id: ReservationId) -> Result<Reservation> {
        ReservationLifecycle::confirm(&mut self.db, id, Self::now())
    }

    /// Cancels a reservation. Cancelling twice is not an error.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id.
    pub fn cancel_reservation(&mut self, id: ReservationId) -> Result<Reservation> {
        ReservationLifecycle::cancel(&mut self.db, id, Self::now())
    }

    /// Fetches one reservation.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        Database::get_reservation(self.db.connection(), id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }

    /// Lists a guest's reservations in every state, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn list_reservations_for_guest(&self, guest: &GuestId) -> Result<Vec<Reservation>> {
        Database::list_reservations_for_guest(self.db.connection(), guest)
    }

    /// Lists a listing's reservations in every state, by check-in date.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn list_reservations_for_listing(&self, listing: &ListingId) -> Result<Vec<Reservation>> {
        Database::list_reservations_for_listing(self.db.connection(), listing)
    }

    // Availability

    /// Returns whether the listing is free from `start` to `end`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] for bad dates, or a store error.
    pub fn is_available(
        &self,
        listing: &ListingId,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        let stay = StayRange::new(start, end)?;
        AvailabilityChecker::is_available(self.db.connection(), listing, stay, exclude)
    }

    /// Returns the confirmed stays on a listing.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn booked_ranges(&self, listing: &ListingId) -> Result<Vec<StayRange>> {
        AvailabilityChecker::booked_ranges(self.db.connection(), listing)
    }

    // Expiry

    /// Expires stale pending holds as of now and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn run_expiry_sweep(&self) -> Result<usize> {
        Ok(self.run_expiry_sweep_at(Self::now(), false)?.expired_count)
    }

    /// Runs the sweep as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn run_expiry_sweep_at(&self, now: DateTime<Utc>, dry_run: bool) -> Result<SweepResult> {
        ExpirySweeper::sweep(&self.db, now, self.hold_ttl, dry_run)
    }

    // Invoices

    /// Fetches the invoice of a reservation.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the reservation has no invoice, including when
    /// it does not exist.
    pub fn get_invoice(&self, reservation: ReservationId) -> Result<Invoice> {
        Database::get_invoice_for_reservation(self.db.connection(), reservation)?.ok_or_else(
            || Error::NotFound {
                resource: format!("invoice for reservation {reservation}"),
            },
        )
    }

    /// Lists a guest's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn list_invoices_for_guest(&self, guest: &GuestId) -> Result<Vec<Invoice>> {
        Database::list_invoices_for_guest(self.db.connection(), guest)
    }

    /// Records a manual status change on a reservation's invoice.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the reservation has no invoice.
    pub fn set_invoice_status(
        &mut self,
        reservation: ReservationId,
        status: InvoiceStatus,
    ) -> Result<Invoice> {
        self.db.immediate(|tx| {
            if !Database::set_invoice_status(tx, reservation, status)? {
                return Err(Error::NotFound {
                    resource: format!("invoice for reservation {reservation}"),
                });
            }
            Database::get_invoice_for_reservation(tx, reservation)?.ok_or_else(|| {
                Error::NotFound {
                    resource: format!("invoice for reservation {reservation}"),
                }
            })
        })
    }

    /// Issues the missing invoice of one reservation.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown reservation,
    /// [`Error::DuplicateInvoice`] if it already has one.
    pub fn issue_invoice(&mut self, reservation: ReservationId) -> Result<Invoice> {
        InvoiceGenerator::issue_invoice(&mut self.db, reservation, Self::now())
    }

    /// Issues invoices for every reservation that lacks one.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn reconcile_invoices(&mut self) -> Result<ReconcileResult> {
        InvoiceGenerator::reconcile_invoices(&mut self.db, Self::now())
    }

    // Listings

    /// Adds a listing to the store or updates its price.
    ///
    /// Existing reservations keep the price they were created with.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn upsert_listing(&mut self, listing: &Listing) -> Result<()> {
        Database::upsert_listing(self.db.connection(), listing, Self::now())
    }

    /// Lists the listings held in the store.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn list_listings(&self) -> Result<Vec<Listing>> {
        Database::list_listings(self.db.connection())
    }
}
