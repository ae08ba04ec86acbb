//! Rendering of reservations, invoices and listings.
//!
//! Every record type is flattened into a row struct that serializes the
//! same way to JSON and CSV; the table format prints the row cells
//! tab-separated under uppercase headers.

use crate::error::CliError;
use crate::utils::format_timestamp;
use serde::Serialize;
use staybook::config::OutputFormat;
use staybook::{Invoice, Listing, Reservation};
use std::io::Write;

/// A flat, printable record.
pub trait Row: Serialize {
    /// Column names, in cell order.
    const HEADERS: &'static [&'static str];

    /// Cell values for the table format.
    fn cells(&self) -> Vec<String>;
}

/// One reservation.
#[derive(Debug, Serialize)]
pub struct ReservationRow {
    pub id: String,
    pub listing_id: String,
    pub guest_id: String,
    pub start: String,
    pub end: String,
    pub nights: u64,
    pub total_price: u64,
    pub status: String,
    pub cancellation: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id().to_string(),
            listing_id: r.listing_id().to_string(),
            guest_id: r.guest_id().to_string(),
            start: r.stay().start().to_string(),
            end: r.stay().end().to_string(),
            nights: r.stay().nights(),
            total_price: r.total_price(),
            status: r.status().to_string(),
            cancellation: r.cancellation().map(|c| c.to_string()),
            created_at: format_timestamp(r.created_at()),
            updated_at: format_timestamp(r.updated_at()),
        }
    }
}

impl Row for ReservationRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "listing_id",
        "guest_id",
        "start",
        "end",
        "nights",
        "total_price",
        "status",
        "cancellation",
        "created_at",
        "updated_at",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.listing_id.clone(),
            self.guest_id.clone(),
            self.start.clone(),
            self.end.clone(),
            self.nights.to_string(),
            self.total_price.to_string(),
            self.status.clone(),
            self.cancellation.clone().unwrap_or_else(|| "-".into()),
            self.created_at.clone(),
            self.updated_at.clone(),
        ]
    }
}

/// One invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceRow {
    pub id: String,
    pub reservation_id: String,
    pub guest_id: String,
    pub amount: u64,
    pub issued_at: String,
    pub due_date: String,
    pub status: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id().to_string(),
            reservation_id: i.reservation_id().to_string(),
            guest_id: i.guest_id().to_string(),
            amount: i.amount(),
            issued_at: format_timestamp(i.issued_at()),
            due_date: i.due_date().to_string(),
            status: i.status().to_string(),
        }
    }
}

impl Row for InvoiceRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "reservation_id",
        "guest_id",
        "amount",
        "issued_at",
        "due_date",
        "status",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.reservation_id.clone(),
            self.guest_id.clone(),
            self.amount.to_string(),
            self.issued_at.clone(),
            self.due_date.clone(),
            self.status.clone(),
        ]
    }
}

/// One listing.
#[derive(Debug, Serialize)]
pub struct ListingRow {
    pub id: String,
    pub nightly_price: u64,
}

impl From<&Listing> for ListingRow {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id.to_string(),
            nightly_price: l.nightly_price,
        }
    }
}

impl Row for ListingRow {
    const HEADERS: &'static [&'static str] = &["id", "nightly_price"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.nightly_price.to_string()]
    }
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Write `rows` to `out` in `format`.
pub fn write_rows<R: Row, W: Write>(
    format: OutputFormat,
    rows: &[R],
    mut out: W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => {
            let header_line = R::HEADERS
                .iter()
                .map(|s| s.to_uppercase())
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(out, "{header_line}")?;
            for row in rows {
                writeln!(out, "{}", row.cells().join("\t"))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)
                .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out);
            // Headers written explicitly so an empty result still has them
            writer.write_record(R::HEADERS).map_err(csv_error)?;
            for row in rows {
                writer.serialize(row).map_err(csv_error)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Print `rows` to stdout in `format`.
pub fn print_rows<R: Row>(format: OutputFormat, rows: &[R]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    write_rows(format, rows, stdout.lock())
}
