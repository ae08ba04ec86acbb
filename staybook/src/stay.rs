//! Stay date ranges.
//!
//! A stay is a pair of calendar dates: the check-in day and the check-out
//! day. Granularity is whole days; there are no partial stays.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated stay from `start` (check-in) to `end` (check-out).
///
/// `end` is always strictly after `start`, so every stay spans at least
/// one night.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use staybook::StayRange;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let stay = StayRange::new(start, end).unwrap();
///
/// assert_eq!(stay.nights(), 3);
/// assert_eq!(stay.to_string(), "2024-03-01..2024-03-04");
///
/// // Zero-length and inverted stays are rejected
/// assert!(StayRange::new(start, start).is_err());
/// assert!(StayRange::new(end, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayRange {
    /// Creates a new stay range.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is not strictly after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidStayRangeError> {
        if end <= start {
            Err(InvalidStayRangeError {
                start: Some(start),
                end: Some(end),
                reason: "end date must be after the start date".into(),
            })
        } else {
            Ok(Self { start, end })
        }
    }

    /// Returns the check-in date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the check-out date.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of billable nights.
    ///
    /// Dates carry no time component, so the elapsed span is already a whole
    /// number of days and never less than one for a valid range.
    #[must_use]
    pub fn nights(&self) -> u64 {
        let days = (self.end - self.start).num_days();
        u64::try_from(days).unwrap_or(0).max(1)
    }

    /// Returns `true` if the two stays share at least one day.
    ///
    /// Both boundaries are inclusive: a stay checking out on the day another
    /// checks in counts as overlapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use staybook::StayRange;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
    /// let first = StayRange::new(d(1), d(4)).unwrap();
    /// let back_to_back = StayRange::new(d(4), d(6)).unwrap();
    /// let later = StayRange::new(d(5), d(6)).unwrap();
    ///
    /// assert!(first.overlaps(&back_to_back));
    /// assert!(!first.overlaps(&later));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.start <= self.end && self.start <= other.end
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Error type for missing or inverted stay dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStayRangeError {
    /// The requested start date, if any.
    pub start: Option<NaiveDate>,
    /// The requested end date, if any.
    pub end: Option<NaiveDate>,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidStayRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |d: Option<NaiveDate>| d.map_or_else(|| "?".to_string(), |d| d.to_string());
        write!(
            f,
            "invalid stay {}..{}: {}",
            show(self.start),
            show(self.end),
            self.reason
        )
    }
}

impl std::error::Error for InvalidStayRangeError {}
