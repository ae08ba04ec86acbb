//! Reservation types for tracking guest holds on listings.
//!
//! This module provides the identifiers, lifecycle status and the
//! `Reservation` record itself, along with a builder for construction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StayRange;

#[cfg(test)]
mod proptests;

/// Unique identifier of a reservation.
///
/// # Examples
///
/// ```
/// use staybook::ReservationId;
///
/// let id = ReservationId::new();
/// let parsed: ReservationId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
///
/// assert!("not-a-uuid".parse::<ReservationId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
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

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReservationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ReservationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ValidationError {
                field: "reservation_id".into(),
                message: format!("not a valid reservation id: {e}"),
            })
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is empty after trimming whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError {
                        field: $field.into(),
                        message: concat!($field, " must be non-empty after trimming whitespace")
                            .into(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

external_id!(
    /// Opaque identifier of a listing, owned by the listing service.
    ///
    /// # Examples
    ///
    /// ```
    /// use staybook::ListingId;
    ///
    /// let id = ListingId::new("  beach-house ").unwrap();
    /// assert_eq!(id.as_str(), "beach-house");
    /// assert!(ListingId::new("   ").is_err());
    /// ```
    ListingId,
    "listing_id"
);

external_id!(
    /// Opaque identifier of a guest, supplied by the authentication layer.
    GuestId,
    "guest_id"
);

/// Lifecycle state of a reservation.
///
/// `Pending` is the initial state and `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created, awaiting confirmation. Expires after the hold TTL.
    Pending,
    /// Acknowledged by the owner or payment flow.
    Confirmed,
    /// Released. No transition leaves this state.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if a reservation in this state blocks new bookings.
    #[must_use]
    pub const fn holds_dates(self) -> bool {
        !self.is_terminal()
    }

    /// Returns `true` if the lifecycle allows moving from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use staybook::ReservationStatus::{Cancelled, Confirmed, Pending};
    ///
    /// assert!(Pending.can_transition_to(Confirmed));
    /// assert!(Confirmed.can_transition_to(Cancelled));
    /// assert!(!Cancelled.can_transition_to(Confirmed));
    /// assert!(!Confirmed.can_transition_to(Pending));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled) | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a reservation was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationReason {
    /// Explicit cancellation requested by a caller.
    Guest,
    /// Pending hold reclaimed by the expiry sweeper.
    Expired,
}

impl CancellationReason {
    /// Returns the storage representation of this reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for CancellationReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "expired" => Ok(Self::Expired),
            other => Err(ValidationError {
                field: "cancellation".into(),
                message: format!("unknown cancellation reason '{other}'"),
            }),
        }
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest's hold on a listing for a stay.
///
/// The listing, guest, stay and total price are fixed at creation. Only the
/// status (and with it the cancellation reason and update time) changes.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use staybook::{GuestId, ListingId, Reservation, ReservationStatus, StayRange};
///
/// let stay = StayRange::new(
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
/// )
/// .unwrap();
///
/// let reservation = Reservation::builder(
///     ListingId::new("loft").unwrap(),
///     GuestId::new("ana").unwrap(),
///     stay,
/// )
/// .total_price(300)
/// .build()
/// .unwrap();
///
/// assert_eq!(reservation.status(), ReservationStatus::Pending);
/// assert_eq!(reservation.total_price(), 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    listing_id: ListingId,
    guest_id: GuestId,
    stay: StayRange,
    total_price: u64,
    status: ReservationStatus,
    cancellation: Option<CancellationReason>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new reservation builder with a fresh id in `pending` state.
    #[must_use]
    pub fn builder(
        listing_id: ListingId,
        guest_id: GuestId,
        stay: StayRange,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id: None,
            listing_id,
            guest_id,
            stay,
            total_price: 0,
            status: ReservationStatus::Pending,
            cancellation: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the reservation id.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the reserved listing.
    #[must_use]
    pub const fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    /// Returns the guest holding the reservation.
    #[must_use]
    pub const fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    /// Returns the reserved stay.
    #[must_use]
    pub const fn stay(&self) -> StayRange {
        self.stay
    }

    /// Returns the total price frozen at creation.
    #[must_use]
    pub const fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns why the reservation was cancelled, if it was.
    #[must_use]
    pub const fn cancellation(&self) -> Option<CancellationReason> {
        self.cancellation
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the last status change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks whether this reservation is an abandoned hold at `now`.
    ///
    /// A hold is stale when it is still `pending` and was created strictly
    /// before `now - ttl`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, NaiveDate, Utc};
    /// use staybook::{GuestId, ListingId, Reservation, StayRange};
    ///
    /// let now = Utc::now();
    /// let stay = StayRange::new(
    ///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
    /// )
    /// .unwrap();
    /// let reservation = Reservation::builder(
    ///     ListingId::new("loft").unwrap(),
    ///     GuestId::new("ana").unwrap(),
    ///     stay,
    /// )
    /// .created_at(now - Duration::hours(25))
    /// .build()
    /// .unwrap();
    ///
    /// assert!(reservation.is_stale(now, Duration::hours(24)));
    /// assert!(!reservation.is_stale(now, Duration::hours(26)));
    /// ```
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.status == ReservationStatus::Pending && self.created_at < now - ttl
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    listing_id: ListingId,
    guest_id: GuestId,
    stay: StayRange,
    total_price: u64,
    status: ReservationStatus,
    cancellation: Option<CancellationReason>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ReservationBuilder {
    /// Sets an explicit id, used when loading from storage.
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the total price.
    #[must_use]
    pub const fn total_price(mut self, total_price: u64) -> Self {
        self.total_price = total_price;
        self
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the cancellation reason.
    #[must_use]
    pub const fn cancellation(mut self, cancellation: Option<CancellationReason>) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last update timestamp.
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the reservation.
    ///
    /// Timestamps default to now, in whole seconds as the store keeps them;
    /// `updated_at` defaults to `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A cancellation reason is set but the status is not `cancelled`
    /// - The status is `cancelled` but no cancellation reason is set
    /// - `updated_at` is before `created_at`
    pub fn build(self) -> Result<Reservation, ValidationError> {
        match (self.status, self.cancellation) {
            (ReservationStatus::Cancelled, None) => {
                return Err(ValidationError {
                    field: "cancellation".into(),
                    message: "cancelled reservations must record a cancellation reason".into(),
                });
            }
            (status, Some(_)) if status != ReservationStatus::Cancelled => {
                return Err(ValidationError {
                    field: "cancellation".into(),
                    message: format!("a {status} reservation cannot carry a cancellation reason"),
                });
            }
            _ => {}
        }

        let created_at = self.created_at.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
        let updated_at = self.updated_at.unwrap_or(created_at);
        if updated_at < created_at {
            return Err(ValidationError {
                field: "updated_at".into(),
                message: "updated_at cannot precede created_at".into(),
            });
        }

        Ok(Reservation {
            id: self.id.unwrap_or_default(),
            listing_id: self.listing_id,
            guest_id: self.guest_id,
            stay: self.stay,
            total_price: self.total_price,
            status: self.status,
            cancellation: self.cancellation,
            created_at,
            updated_at,
        })
    }
}

/// Validation error for reservation and identifier fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stay() -> StayRange {
        StayRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        )
        .unwrap()
    }

    fn builder() -> ReservationBuilder {
        Reservation::builder(
            ListingId::new("loft").unwrap(),
            GuestId::new("ana").unwrap(),
            stay(),
        )
    }

    #[test]
    fn test_external_ids_trim_and_reject_empty() {
        assert_eq!(GuestId::new(" ana ").unwrap().as_str(), "ana");
        let err = GuestId::new("").unwrap_err();
        assert_eq!(err.field, "guest_id");
        assert!(ListingId::new("\t").is_err());
    }

    #[test]
    fn test_reservation_id_roundtrip_display() {
        let id = ReservationId::new();
        assert_eq!(id.to_string().parse::<ReservationId>().unwrap(), id);
        assert_ne!(ReservationId::new(), ReservationId::new());
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(
            "Confirmed".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Confirmed
        );
        assert_eq!(ReservationStatus::Cancelled.to_string(), "cancelled");
        assert!("held".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::{Cancelled, Confirmed, Pending};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_holds_dates() {
        assert!(ReservationStatus::Pending.holds_dates());
        assert!(ReservationStatus::Confirmed.holds_dates());
        assert!(!ReservationStatus::Cancelled.holds_dates());
    }

    #[test]
    fn test_builder_defaults() {
        let reservation = builder().build().unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(reservation.cancellation(), None);
        assert_eq!(reservation.created_at(), reservation.updated_at());
    }

    #[test]
    fn test_builder_requires_reason_for_cancelled() {
        let err = builder()
            .status(ReservationStatus::Cancelled)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "cancellation");

        let ok = builder()
            .status(ReservationStatus::Cancelled)
            .cancellation(Some(CancellationReason::Expired))
            .build()
            .unwrap();
        assert_eq!(ok.cancellation(), Some(CancellationReason::Expired));
    }

    #[test]
    fn test_builder_rejects_reason_when_not_cancelled() {
        let err = builder()
            .status(ReservationStatus::Confirmed)
            .cancellation(Some(CancellationReason::Guest))
            .build()
            .unwrap_err();
        assert!(err.message.contains("confirmed"));
    }

    #[test]
    fn test_builder_rejects_update_before_creation() {
        let now = Utc::now();
        let err = builder()
            .created_at(now)
            .updated_at(now - Duration::seconds(1))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "updated_at");
    }

    #[test]
    fn test_is_stale_only_for_pending() {
        let now = Utc::now();
        let old = now - Duration::hours(30);

        let pending = builder().created_at(old).build().unwrap();
        assert!(pending.is_stale(now, Duration::hours(24)));

        let confirmed = builder()
            .created_at(old)
            .status(ReservationStatus::Confirmed)
            .build()
            .unwrap();
        assert!(!confirmed.is_stale(now, Duration::hours(24)));
    }

    #[test]
    fn test_reservation_serde_shape() {
        let reservation = builder().total_price(300).build().unwrap();
        let json = serde_json::to_value(&reservation).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["listing_id"], "loft");
        assert_eq!(json["stay"]["start"], "2024-03-01");
        assert_eq!(json["total_price"], 300);
    }
}
