//! Listing lookup.
//!
//! Listings are owned by an external service. The engine needs only one
//! fact about them: the nightly price at the moment a reservation is made.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reservation::ListingId;

/// The slice of a listing the reservation engine depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing identifier.
    pub id: ListingId,
    /// Price per night in whole currency units.
    pub nightly_price: u64,
}

impl Listing {
    /// Creates a listing record.
    #[must_use]
    pub const fn new(id: ListingId, nightly_price: u64) -> Self {
        Self { id, nightly_price }
    }
}

/// Resolves listing ids to their current pricing.
///
/// `Ok(None)` means the listing does not exist; `Err` means the lookup
/// itself failed.
#[cfg_attr(test, mockall::automock)]
pub trait ListingDirectory {
    /// Looks up a listing by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing service cannot be queried.
    fn get_listing(&self, id: &ListingId) -> Result<Option<Listing>>;
}
