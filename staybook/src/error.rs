//! Error types for the staybook library.
//!
//! This module provides the error hierarchy for all booking operations,
//! using `thiserror` for ergonomic error handling.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::reservation::{ReservationId, ReservationStatus};

/// Result type alias for operations that may fail with a staybook error.
///
/// # Examples
///
/// ```
/// use staybook::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(300)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the staybook library.
#[derive(Debug, Error)]
pub enum Error {
    /// Stay dates were missing, equal or inverted.
    #[error("invalid stay dates: {reason}")]
    InvalidRange {
        /// The reason the dates were rejected.
        reason: String,
    },

    /// The listing id did not resolve.
    #[error("listing not found: {listing}")]
    ListingNotFound {
        /// The listing that was requested.
        listing: String,
    },

    /// The requested stay overlaps an existing reservation.
    #[error("{kind}: already booked from {existing_start} to {existing_end}")]
    Conflict {
        /// Which overlap check failed.
        kind: ConflictKind,
        /// Check-in date of the conflicting reservation.
        existing_start: NaiveDate,
        /// Check-out date of the conflicting reservation.
        existing_end: NaiveDate,
    },

    /// The requested lifecycle transition is not allowed from the current state.
    #[error("cannot {action} reservation {reservation}: it is {current}")]
    InvalidTransition {
        /// The reservation involved.
        reservation: ReservationId,
        /// The attempted action.
        action: &'static str,
        /// The state the reservation was in.
        current: ReservationStatus,
    },

    /// An invoice already exists for the reservation.
    #[error("invoice already exists for reservation {reservation}")]
    DuplicateInvoice {
        /// The reservation that is already invoiced.
        reservation: ReservationId,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The store is busy or locked; the operation may be retried.
    #[error("reservation store unavailable: {reason}")]
    StoreUnavailable {
        /// Details from the store.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

/// Which creation-time overlap check rejected a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// The guest already holds an overlapping reservation, on any listing.
    GuestOverlap,
    /// The listing already has an overlapping reservation.
    ListingOverlap,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GuestOverlap => write!(f, "guest already has a booking during these dates"),
            Self::ListingOverlap => write!(f, "listing is already booked for these dates"),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
            if matches!(
                failure.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return Self::StoreUnavailable {
                    reason: err.to_string(),
                };
            }
        }
        Self::Database(err)
    }
}

impl From<crate::stay::InvalidStayRangeError> for Error {
    fn from(err: crate::stay::InvalidStayRangeError) -> Self {
        Self::InvalidRange {
            reason: err.to_string(),
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the caller may retry the operation unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use staybook::Error;
    ///
    /// let err = Error::StoreUnavailable { reason: "database is locked".into() };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::NotFound { resource: "reservation".into() };
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Check if the error is a booking conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the error indicates an unknown id.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ListingNotFound { .. })
    }
}
