//! Database operations for invoices.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::{GuestId, Invoice, InvoiceId, InvoiceStatus, ReservationId};

use super::connection::Database;
use super::operations::{
    amount_column, amount_to_sql, date_column, date_to_sql, parsed_column, timestamp_column,
    to_unix_secs,
};

const INSERT_INVOICE: &str = r"
    INSERT INTO invoices (id, reservation_id, guest_id, amount, issued_at, due_date, status)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
";

const SELECT_BY_RESERVATION: &str = r"
    SELECT id, reservation_id, guest_id, amount, issued_at, due_date, status
    FROM invoices
    WHERE reservation_id = ?1
";

const SELECT_BY_GUEST: &str = r"
    SELECT id, reservation_id, guest_id, amount, issued_at, due_date, status
    FROM invoices
    WHERE guest_id = ?1
    ORDER BY issued_at DESC, id
";

const INVOICE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM invoices WHERE reservation_id = ?1)";

const UPDATE_STATUS: &str = "UPDATE invoices SET status = ?2 WHERE reservation_id = ?1";

const SELECT_UNINVOICED: &str = r"
    SELECT r.id
    FROM reservations r
    LEFT JOIN invoices i ON i.reservation_id = r.id
    WHERE i.id IS NULL
    ORDER BY r.created_at
";

fn row_to_invoice(row: &rusqlite::Row<'_>) -> rusqlite::Result<Invoice> {
    let id: InvoiceId = parsed_column(row, 0)?;
    let reservation_id: ReservationId = parsed_column(row, 1)?;
    let guest_id: GuestId = parsed_column(row, 2)?;
    let amount = amount_column(row, 3)?;
    let issued_at = timestamp_column(row, 4)?;
    let due_date = date_column(row, 5)?;
    let status: InvoiceStatus = parsed_column(row, 6)?;

    Ok(Invoice::restore(
        id,
        reservation_id,
        guest_id,
        amount,
        issued_at,
        due_date,
        status,
    ))
}

impl Database {
    /// Inserts an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateInvoice`] if the reservation already has an
    /// invoice, or a database error if the insert fails.
    pub fn insert_invoice(conn: &Connection, invoice: &Invoice) -> Result<()> {
        if Self::invoice_exists(conn, invoice.reservation_id())? {
            return Err(Error::DuplicateInvoice {
                reservation: invoice.reservation_id(),
            });
        }

        conn.execute(
            INSERT_INVOICE,
            params![
                invoice.id().to_string(),
                invoice.reservation_id().to_string(),
                invoice.guest_id().as_str(),
                amount_to_sql(invoice.amount(), "amount")?,
                to_unix_secs(invoice.issued_at()),
                date_to_sql(invoice.due_date()),
                invoice.status().as_str(),
            ],
        )?;
        Ok(())
    }

    /// Checks whether a reservation has an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn invoice_exists(conn: &Connection, reservation: ReservationId) -> Result<bool> {
        let exists: bool =
            conn.query_row(INVOICE_EXISTS, [reservation.to_string()], |row| row.get(0))?;
        Ok(exists)
    }

    /// Retrieves the invoice of a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_invoice_for_reservation(
        conn: &Connection,
        reservation: ReservationId,
    ) -> Result<Option<Invoice>> {
        let invoice = conn
            .query_row(
                SELECT_BY_RESERVATION,
                [reservation.to_string()],
                row_to_invoice,
            )
            .optional()?;
        Ok(invoice)
    }

    /// Lists a guest's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_invoices_for_guest(conn: &Connection, guest: &GuestId) -> Result<Vec<Invoice>> {
        let mut stmt = conn.prepare(SELECT_BY_GUEST)?;
        let invoices = stmt
            .query_map([guest.as_str()], row_to_invoice)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(invoices)
    }

    /// Sets the status of a reservation's invoice.
    ///
    /// Returns `false` if the reservation has no invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_invoice_status(
        conn: &Connection,
        reservation: ReservationId,
        status: InvoiceStatus,
    ) -> Result<bool> {
        let rows = conn.execute(
            UPDATE_STATUS,
            params![reservation.to_string(), status.as_str()],
        )?;
        Ok(rows > 0)
    }

    /// Lists reservations that have no invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_uninvoiced_reservations(conn: &Connection) -> Result<Vec<ReservationId>> {
        let mut stmt = conn.prepare(SELECT_UNINVOICED)?;
        let ids = stmt
            .query_map([], |row| parsed_column(row, 0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(ids)
    }
}
