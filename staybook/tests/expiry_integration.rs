//! Hold expiry: the sweep at fixed times and the background scheduler.

mod common;

use std::time::Duration;

use common::{date, guest, listing, timestamp, TestStore};
use staybook::operations::{ExpiryScheduler, SchedulerOptions};
use staybook::{CancellationReason, ReservationStatus};

const HOUR: i64 = 3600;

#[test]
fn test_sweep_at_fixed_time() {
    let store = TestStore::new();
    let mut engine = store.engine();

    // Sweep at T = 48h: T-25h is stale, T-23h is not
    let stale = engine
        .create_reservation_at(
            &listing("loft"),
            guest("ana"),
            date(3, 1),
            date(3, 4),
            timestamp(23 * HOUR),
        )
        .unwrap();
    let fresh = engine
        .create_reservation_at(
            &listing("cabin"),
            guest("ben"),
            date(3, 1),
            date(3, 4),
            timestamp(25 * HOUR),
        )
        .unwrap();
    let confirmed = engine
        .create_reservation_at(&listing("barn"), guest("cy"), date(3, 1), date(3, 4), timestamp(0))
        .unwrap();
    let cancelled = engine
        .create_reservation_at(&listing("loft"), guest("dee"), date(4, 1), date(4, 4), timestamp(0))
        .unwrap();
    engine.confirm_reservation(confirmed.reservation.id()).unwrap();
    engine.cancel_reservation(cancelled.reservation.id()).unwrap();

    let preview = engine.run_expiry_sweep_at(timestamp(48 * HOUR), true).unwrap();
    assert_eq!(preview.expired_count, 1);

    let result = engine.run_expiry_sweep_at(timestamp(48 * HOUR), false).unwrap();
    assert_eq!(result.expired_count, 1);
    assert_eq!(result.expired_reservations[0].id(), stale.reservation.id());

    let status = |id| engine.get_reservation(id).unwrap();
    let expired = status(stale.reservation.id());
    assert_eq!(expired.cancellation(), Some(CancellationReason::Expired));
    assert_eq!(status(fresh.reservation.id()).status(), ReservationStatus::Pending);
    assert_eq!(status(confirmed.reservation.id()).status(), ReservationStatus::Confirmed);
    assert_eq!(
        status(cancelled.reservation.id()).cancellation(),
        Some(CancellationReason::Guest)
    );

    // The invoice stays on record
    assert!(engine.get_invoice(stale.reservation.id()).is_ok());
}

#[test]
fn test_expired_hold_frees_listing() {
    let store = TestStore::new();
    let mut engine = store.engine();
    engine
        .create_reservation_at(&listing("loft"), guest("ana"), date(3, 1), date(3, 4), timestamp(0))
        .unwrap();

    assert!(!engine.is_available(&listing("loft"), date(3, 2), date(3, 3), None).unwrap());
    engine.run_expiry_sweep_at(timestamp(25 * HOUR), false).unwrap();
    assert!(engine.is_available(&listing("loft"), date(3, 2), date(3, 3), None).unwrap());

    engine
        .create_reservation(&listing("loft"), guest("ben"), date(3, 2), date(3, 3))
        .unwrap();
}

#[test]
fn test_run_expiry_sweep_uses_wall_clock() {
    let store = TestStore::new();
    let mut engine = store.engine();
    // Created in 2024, so stale by any wall clock reading of today
    engine
        .create_reservation_at(&listing("loft"), guest("ana"), date(3, 1), date(3, 4), timestamp(0))
        .unwrap();
    let fresh = engine
        .create_reservation(&listing("cabin"), guest("ben"), date(3, 1), date(3, 4))
        .unwrap();

    assert_eq!(engine.run_expiry_sweep().unwrap(), 1);
    assert_eq!(engine.run_expiry_sweep().unwrap(), 0);
    assert_eq!(
        engine.get_reservation(fresh.id()).unwrap().status(),
        ReservationStatus::Pending
    );
}

#[test]
fn test_scheduler_sweeps_with_own_connection() {
    let store = TestStore::new();
    let mut engine = store.engine();
    let stale = engine
        .create_reservation_at(&listing("loft"), guest("ana"), date(3, 1), date(3, 4), timestamp(0))
        .unwrap();

    let options = SchedulerOptions {
        interval: Duration::from_millis(20),
        hold_ttl: chrono::Duration::hours(24),
        max_ticks: Some(2),
    };
    let report = ExpiryScheduler::spawn(store.config(), options).unwrap().join();

    assert_eq!(report.ticks, 2);
    assert_eq!(report.expired, 1);
    assert_eq!(
        engine.get_reservation(stale.reservation.id()).unwrap().status(),
        ReservationStatus::Cancelled
    );
}

#[test]
fn test_scheduler_stops_on_request() {
    let store = TestStore::new();
    let options = SchedulerOptions {
        interval: Duration::from_secs(3600),
        hold_ttl: chrono::Duration::hours(24),
        max_ticks: None,
    };
    let handle = ExpiryScheduler::spawn(store.config(), options).unwrap();
    let report = handle.stop();
    assert_eq!(report.ticks, 1);
    assert_eq!(report.failures, 0);
}
