//! Expiry of abandoned pending holds.
//!
//! A run at `now` cancels, with reason `expired`, every pending reservation
//! created strictly before `now - ttl`. The result depends only on `now`
//! and the store contents, so the same run can be replayed in tests.
//!
//! ## Transactional Semantics
//!
//! Reservations are expired one by one, each update committing on its own.
//! Every update is a compare-and-set on `status = 'pending'`: a reservation
//! confirmed or cancelled between the query and the update is skipped and
//! not counted. A failure midway leaves earlier expirations committed; the
//! next run picks up the rest.

use chrono::{DateTime, Duration, Utc};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::operations::lifecycle::ReservationLifecycle;
use crate::Reservation;

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepResult {
    /// Number of reservations expired (or that would be, in dry-run mode).
    pub expired_count: usize,
    /// The reservations expired, as stored after the run. In dry-run mode
    /// they are still pending.
    pub expired_reservations: Vec<Reservation>,
}

/// Cancels stale pending reservations.
pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Runs one sweep at `now`, expiring holds older than `ttl`.
    ///
    /// With `dry_run` the stale holds are reported and nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `now - ttl` is out of range, or a store
    /// error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::{Duration, Utc};
    /// use staybook::database::{Database, DatabaseConfig};
    /// use staybook::operations::ExpirySweeper;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
    ///
    /// let preview = ExpirySweeper::sweep(&db, Utc::now(), Duration::hours(24), true).unwrap();
    /// println!("would expire {} holds", preview.expired_count);
    /// ```
    pub fn sweep(
        db: &Database,
        now: DateTime<Utc>,
        ttl: Duration,
        dry_run: bool,
    ) -> Result<SweepResult> {
        let cutoff = Self::cutoff(now, ttl)?;
        // The query narrows by cutoff; `is_stale` is the rule
        let stale: Vec<Reservation> = Database::find_stale_pending(db.connection(), cutoff)?
            .into_iter()
            .filter(|r| r.is_stale(now, ttl))
            .collect();

        if dry_run {
            return Ok(SweepResult {
                expired_count: stale.len(),
                expired_reservations: stale,
            });
        }

        let mut expired_reservations = Vec::with_capacity(stale.len());
        for reservation in stale {
            if !ReservationLifecycle::expire(db, reservation.id(), now)? {
                log::debug!(
                    "reservation {} left pending state before it could expire",
                    reservation.id()
                );
                continue;
            }
            if let Some(updated) = Database::get_reservation(db.connection(), reservation.id())? {
                expired_reservations.push(updated);
            }
        }

        if !expired_reservations.is_empty() {
            log::info!(
                "expired {} pending reservation(s) older than {} hours",
                expired_reservations.len(),
                ttl.num_hours()
            );
        }

        Ok(SweepResult {
            expired_count: expired_reservations.len(),
            expired_reservations,
        })
    }

    /// Returns the creation time before which a pending hold is stale.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the subtraction overflows.
    pub fn cutoff(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(ttl).ok_or_else(|| Error::Validation {
            field: "hold_ttl".into(),
            message: format!("hold TTL of {} hours is out of range", ttl.num_hours()),
        })
    }
}
