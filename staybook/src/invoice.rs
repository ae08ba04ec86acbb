//! Invoice types.
//!
//! Every reservation is paired with exactly one invoice recording what the
//! guest owes. Settlement is out of scope; the invoice status is maintained
//! by manual reconciliation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reservation::{GuestId, Reservation, ReservationId, ValidationError};

/// Unique identifier of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for InvoiceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for InvoiceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ValidationError {
                field: "invoice_id".into(),
                message: format!("not a valid invoice id: {e}"),
            })
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued and unpaid.
    Pending,
    /// Settled.
    Paid,
    /// Unpaid past its due date.
    Overdue,
}

impl InvoiceStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            other => Err(ValidationError {
                field: "invoice_status".into(),
                message: format!("unknown invoice status '{other}'"),
            }),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The financial record paired with a reservation.
///
/// The amount is copied from the reservation at issue time and never
/// recalculated afterwards.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, Utc};
/// use staybook::{GuestId, Invoice, InvoiceStatus, ListingId, Reservation, StayRange};
///
/// let stay = StayRange::new(
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
/// )
/// .unwrap();
/// let reservation = Reservation::builder(
///     ListingId::new("loft").unwrap(),
///     GuestId::new("ana").unwrap(),
///     stay,
/// )
/// .total_price(300)
/// .build()
/// .unwrap();
///
/// let invoice = Invoice::for_reservation(&reservation, Utc::now());
/// assert_eq!(invoice.amount(), 300);
/// assert_eq!(invoice.due_date(), stay.end());
/// assert_eq!(invoice.status(), InvoiceStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    reservation_id: ReservationId,
    guest_id: GuestId,
    amount: u64,
    issued_at: DateTime<Utc>,
    due_date: NaiveDate,
    status: InvoiceStatus,
}

impl Invoice {
    /// Derives a fresh `pending` invoice from a reservation's terms.
    #[must_use]
    pub fn for_reservation(reservation: &Reservation, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: InvoiceId::new(),
            reservation_id: reservation.id(),
            guest_id: reservation.guest_id().clone(),
            amount: reservation.total_price(),
            issued_at,
            due_date: reservation.stay().end(),
            status: InvoiceStatus::Pending,
        }
    }

    /// Reassembles an invoice from stored fields.
    pub(crate) const fn restore(
        id: InvoiceId,
        reservation_id: ReservationId,
        guest_id: GuestId,
        amount: u64,
        issued_at: DateTime<Utc>,
        due_date: NaiveDate,
        status: InvoiceStatus,
    ) -> Self {
        Self {
            id,
            reservation_id,
            guest_id,
            amount,
            issued_at,
            due_date,
            status,
        }
    }

    /// Returns the invoice id.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the reservation this invoice belongs to.
    #[must_use]
    pub const fn reservation_id(&self) -> ReservationId {
        self.reservation_id
    }

    /// Returns the paying guest.
    #[must_use]
    pub const fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    /// Returns the invoiced amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns when the invoice was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns the due date (the reservation's check-out date).
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn status(&self) -> InvoiceStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::ListingId;
    use crate::StayRange;

    #[test]
    fn test_invoice_copies_reservation_terms() {
        let stay = StayRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
        )
        .unwrap();
        let reservation = Reservation::builder(
            ListingId::new("cabin").unwrap(),
            GuestId::new("bo").unwrap(),
            stay,
        )
        .total_price(240)
        .build()
        .unwrap();

        let issued_at = Utc::now();
        let invoice = Invoice::for_reservation(&reservation, issued_at);

        assert_eq!(invoice.reservation_id(), reservation.id());
        assert_eq!(invoice.guest_id().as_str(), "bo");
        assert_eq!(invoice.amount(), 240);
        assert_eq!(invoice.issued_at(), issued_at);
        assert_eq!(invoice.due_date(), NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(invoice.status(), InvoiceStatus::Pending);
    }

    #[test]
    fn test_invoice_status_parse() {
        assert_eq!("PAID".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        assert_eq!(
            "overdue".parse::<InvoiceStatus>().unwrap(),
            InvoiceStatus::Overdue
        );
        let err = "void".parse::<InvoiceStatus>().unwrap_err();
        assert!(err.message.contains("void"));
    }

    #[test]
    fn test_invoice_id_parse() {
        let id = InvoiceId::new();
        assert_eq!(id.to_string().parse::<InvoiceId>().unwrap(), id);
        assert!("xyz".parse::<InvoiceId>().is_err());
    }
}
