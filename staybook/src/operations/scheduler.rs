//! Background expiry scheduling.
//!
//! [`ExpiryScheduler::spawn`] starts one thread that owns its own store
//! connection and runs [`ExpirySweeper::sweep`] once at start and then on
//! every interval. The thread stops when the [`SchedulerHandle`] is stopped
//! or dropped, or after `max_ticks` sweeps.
//!
//! A failed sweep is logged and counted; the next tick tries again.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{SubsecRound, Utc};

use crate::config::Config;
use crate::database::{Database, DatabaseConfig};
use crate::error::{Error, Result};
use crate::operations::sweep::ExpirySweeper;

/// How the scheduler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Time between sweeps.
    pub interval: Duration,
    /// Age after which a pending hold expires.
    pub hold_ttl: chrono::Duration,
    /// Stop after this many sweeps. `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

impl SchedulerOptions {
    /// Takes the interval and hold TTL from `config`, with no tick limit.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.sweep_interval(),
            hold_ttl: config.hold_ttl(),
            max_ticks: None,
        }
    }

    /// Limits the number of sweeps.
    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

/// Totals over the scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerReport {
    /// Sweeps run, including failed ones.
    pub ticks: u64,
    /// Reservations expired across all sweeps.
    pub expired: usize,
    /// Sweeps that returned an error.
    pub failures: u64,
}

/// Runs the expiry sweep on a background thread.
pub struct ExpiryScheduler;

impl ExpiryScheduler {
    /// Opens a store connection and starts the sweep thread.
    ///
    /// The connection is opened before the thread starts, so a bad path or
    /// schema is reported here.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero, the store cannot be opened,
    /// or the thread cannot be spawned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use staybook::config::Config;
    /// use staybook::database::DatabaseConfig;
    /// use staybook::operations::{ExpiryScheduler, SchedulerOptions};
    ///
    /// let options = SchedulerOptions::from_config(&Config::default());
    /// let handle =
    ///     ExpiryScheduler::spawn(DatabaseConfig::new("/tmp/staybook.db"), options).unwrap();
    /// // ... serve requests ...
    /// let report = handle.stop();
    /// println!("{} sweeps, {} expired", report.ticks, report.expired);
    /// ```
    pub fn spawn(config: DatabaseConfig, options: SchedulerOptions) -> Result<SchedulerHandle> {
        if options.interval.is_zero() {
            return Err(Error::Validation {
                field: "sweep_interval".into(),
                message: "must be greater than zero".into(),
            });
        }

        let db = Database::open(config)?;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval_secs = options.interval.as_secs();
        let ttl_hours = options.hold_ttl.num_hours();

        let thread = thread::Builder::new()
            .name("staybook-expiry".into())
            .spawn(move || {
                let mut report = SchedulerReport::default();
                loop {
                    Self::tick(&db, &options, &mut report);

                    if options.max_ticks.is_some_and(|max| report.ticks >= max) {
                        break;
                    }

                    match stop_rx.recv_timeout(options.interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!(
                    "expiry scheduler stopped after {} sweep(s), {} expired",
                    report.ticks,
                    report.expired
                );
                report
            })?;

        log::debug!("expiry scheduler started: every {interval_secs}s, hold TTL {ttl_hours}h");

        Ok(SchedulerHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    fn tick(db: &Database, options: &SchedulerOptions, report: &mut SchedulerReport) {
        report.ticks += 1;
        let now = Utc::now().trunc_subsecs(0);
        match ExpirySweeper::sweep(db, now, options.hold_ttl, false) {
            Ok(result) => report.expired += result.expired_count,
            Err(e) => {
                report.failures += 1;
                log::warn!("expiry sweep failed: {e}");
            }
        }
    }
}

/// Owns the sweep thread. Dropping the handle stops the thread and waits
/// for it.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<SchedulerReport>>,
}

impl SchedulerHandle {
    /// Signals the thread to stop and waits for it.
    ///
    /// A sweep already in progress finishes first.
    #[must_use = "the report is the only record of what the scheduler did"]
    pub fn stop(mut self) -> SchedulerReport {
        self.signal_stop();
        self.wait()
    }

    /// Waits for the thread to finish on its own, which only happens when
    /// `max_ticks` is set.
    #[must_use = "the report is the only record of what the scheduler did"]
    pub fn join(mut self) -> SchedulerReport {
        self.wait()
    }

    /// Returns whether the sweep thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn signal_stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may have exited already
            let _ = tx.send(());
        }
    }

    fn wait(&mut self) -> SchedulerReport {
        self.thread.take().map_or_else(SchedulerReport::default, |thread| {
            thread.join().unwrap_or_else(|_| {
                log::warn!("expiry scheduler thread panicked");
                SchedulerReport::default()
            })
        })
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.signal_stop();
        let _ = self.wait();
    }
}
