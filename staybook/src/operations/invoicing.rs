//! Invoice issuance.
//!
//! Every reservation gets exactly one invoice. Normally it is issued in the
//! same transaction that creates the reservation; [`InvoiceGenerator::reconcile_invoices`]
//! repairs rows that lack one (imported data, or writes from older tools).

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::{Invoice, Reservation, ReservationId};

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileResult {
    /// Number of invoices issued.
    pub issued_count: usize,
    /// The invoices that were issued.
    pub issued_invoices: Vec<Invoice>,
}

/// Issues invoices for reservations.
pub struct InvoiceGenerator;

impl InvoiceGenerator {
    /// Issues the invoice for `reservation` at `now`.
    ///
    /// Amount is the reservation total, due on the checkout date, status
    /// `pending`. Runs on the caller's connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateInvoice`] if the reservation is already
    /// invoiced, or a store error.
    pub fn create(
        conn: &Connection,
        reservation: &Reservation,
        now: DateTime<Utc>,
    ) -> Result<Invoice> {
        let invoice = Invoice::for_reservation(reservation, now);
        Database::insert_invoice(conn, &invoice)?;
        log::debug!(
            "issued invoice {} for reservation {} ({})",
            invoice.id(),
            reservation.id(),
            invoice.amount()
        );
        Ok(invoice)
    }

    /// Issues the missing invoice of one reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation,
    /// [`Error::DuplicateInvoice`] if it is already invoiced, or a store
    /// error.
    pub fn issue_invoice(
        db: &mut Database,
        reservation: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<Invoice> {
        db.immediate(|tx| {
            let found = Database::get_reservation(tx, reservation)?.ok_or_else(|| {
                Error::NotFound {
                    resource: format!("reservation {reservation}"),
                }
            })?;
            Self::create(tx, &found, now)
        })
    }

    /// Issues invoices for every reservation that has none.
    ///
    /// All invoices are issued in one transaction.
    ///
    /// # Errors
    ///
    /// Returns a store error; nothing is issued in that case.
    pub fn reconcile_invoices(db: &mut Database, now: DateTime<Utc>) -> Result<ReconcileResult> {
        let issued_invoices = db.immediate(|tx| {
            let mut issued = Vec::new();
            for id in Database::find_uninvoiced_reservations(tx)? {
                if let Some(reservation) = Database::get_reservation(tx, id)? {
                    issued.push(Self::create(tx, &reservation, now)?);
                }
            }
            Ok(issued)
        })?;

        if !issued_invoices.is_empty() {
            log::info!("issued {} missing invoice(s)", issued_invoices.len());
        }

        Ok(ReconcileResult {
            issued_count: issued_invoices.len(),
            issued_invoices,
        })
    }
}
