//! Property-based tests for the booking invariants.
//!
//! Random sequences of creations and cancellations are applied to a real
//! store; afterwards no two non-cancelled reservations may overlap on one
//! listing or for one guest.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::lifecycle::ReservationLifecycle;
use crate::database::test_util::{create_test_database, timestamp};
use crate::database::Database;
use crate::{GuestId, Listing, ListingId, Reservation, StayRange};

const LISTINGS: [&str; 3] = ["loft", "cabin", "barn"];
const GUESTS: [&str; 4] = ["ana", "ben", "cy", "dee"];

#[derive(Debug, Clone)]
enum Step {
    Create {
        listing: usize,
        guest: usize,
        offset: i64,
        nights: i64,
    },
    // Cancels the n-th reservation created so far, if any
    Cancel(usize),
    Confirm(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0..LISTINGS.len(), 0..GUESTS.len(), 0i64..40, 1i64..8).prop_map(
            |(listing, guest, offset, nights)| Step::Create {
                listing,
                guest,
                offset,
                nights,
            }
        ),
        1 => (0usize..32).prop_map(Step::Cancel),
        1 => (0usize..32).prop_map(Step::Confirm),
    ]
}

fn stay(offset: i64, nights: i64) -> StayRange {
    let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let start = base + Duration::days(offset);
    StayRange::new(start, start + Duration::days(nights)).unwrap()
}

fn assert_disjoint(active: &[&Reservation]) -> Result<(), TestCaseError> {
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            prop_assert!(
                !a.stay().overlaps(&b.stay()),
                "{} and {} overlap: {} / {}",
                a.id(),
                b.id(),
                a.stay(),
                b.stay()
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn active_reservations_never_overlap(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let mut db = create_test_database();
        let listings: Vec<Listing> = LISTINGS
            .iter()
            .map(|id| Listing::new(ListingId::new(*id).unwrap(), 100))
            .collect();
        let mut created = Vec::new();

        for (tick, step) in steps.into_iter().enumerate() {
            let now = timestamp(i64::try_from(tick).unwrap());
            match step {
                Step::Create { listing, guest, offset, nights } => {
                    let result = ReservationLifecycle::create(
                        &mut db,
                        &listings[listing],
                        GuestId::new(GUESTS[guest]).unwrap(),
                        stay(offset, nights),
                        now,
                    );
                    match result {
                        Ok(c) => created.push(c.reservation.id()),
                        Err(e) => prop_assert!(e.is_conflict(), "unexpected error: {e}"),
                    }
                }
                Step::Cancel(n) => {
                    if let Some(id) = created.get(n) {
                        ReservationLifecycle::cancel(&mut db, *id, now).unwrap();
                    }
                }
                Step::Confirm(n) => {
                    if let Some(id) = created.get(n) {
                        // Confirming a cancelled or confirmed one is a rejected transition
                        let _ = ReservationLifecycle::confirm(&mut db, *id, now);
                    }
                }
            }
        }

        let mut all = Vec::new();
        for listing in &listings {
            let stored =
                Database::list_reservations_for_listing(db.connection(), &listing.id).unwrap();
            all.extend(stored);
        }
        prop_assert_eq!(all.len(), created.len());

        for listing in &listings {
            let active: Vec<&Reservation> = all
                .iter()
                .filter(|r| r.listing_id() == &listing.id && r.status().holds_dates())
                .collect();
            assert_disjoint(&active)?;
        }

        for guest in GUESTS {
            let active: Vec<&Reservation> = all
                .iter()
                .filter(|r| r.guest_id().as_str() == guest && r.status().holds_dates())
                .collect();
            assert_disjoint(&active)?;
        }
    }

    #[test]
    fn total_price_is_nights_times_rate(
        offset in 0i64..365,
        nights in 1i64..60,
        rate in 1u64..10_000,
    ) {
        let listing = Listing::new(ListingId::new("loft").unwrap(), rate);
        let stay = stay(offset, nights);
        prop_assert_eq!(
            ReservationLifecycle::total_price(&listing, stay).unwrap(),
            rate * u64::try_from(nights).unwrap()
        );
    }
}
