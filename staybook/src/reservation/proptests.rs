//! Property-based tests for reservation identifiers, status and stays.

use super::{GuestId, ListingId, Reservation, ReservationStatus};
use crate::StayRange;
use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop_oneof![
        Just(ReservationStatus::Pending),
        Just(ReservationStatus::Confirmed),
        Just(ReservationStatus::Cancelled),
    ]
}

// Stays within a two-year window, 1..=30 nights long
fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (0i64..730, 1i64..=30).prop_map(|(offset, nights)| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let start = base + Duration::days(offset);
        StayRange::new(start, start + Duration::days(nights)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Identifiers keep their trimmed content
    #[test]
    fn external_id_trims(raw in "[a-z0-9-]{1,20}", pad in " {0,3}") {
        let padded = format!("{pad}{raw}{pad}");
        let id = ListingId::new(padded).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    // Status string form parses back to itself
    #[test]
    fn status_parse_display(status in status_strategy()) {
        let parsed: ReservationStatus = status.to_string().parse().unwrap();
        prop_assert_eq!(parsed, status);
    }

    // Nothing ever leaves the terminal state, and nothing re-enters pending
    #[test]
    fn terminal_and_initial_states(from in status_strategy(), to in status_strategy()) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
        prop_assert!(!from.can_transition_to(ReservationStatus::Pending));
    }

    // Inclusive overlap agrees with a day-by-day check
    #[test]
    fn overlap_matches_shared_day(a in stay_strategy(), b in stay_strategy()) {
        let mut shared = false;
        let mut day = a.start();
        while day <= a.end() {
            if b.start() <= day && day <= b.end() {
                shared = true;
                break;
            }
            day += Duration::days(1);
        }
        prop_assert_eq!(a.overlaps(&b), shared);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Price scales with the number of nights
    #[test]
    fn nights_match_date_difference(stay in stay_strategy()) {
        let expected = (stay.end() - stay.start()).num_days();
        prop_assert_eq!(stay.nights(), u64::try_from(expected).unwrap());
        prop_assert!(stay.nights() >= 1);
    }

    // Freshly built reservations are never stale
    #[test]
    fn fresh_reservation_not_stale(stay in stay_strategy(), ttl_hours in 1i64..100) {
        let now = Utc::now();
        let reservation = Reservation::builder(
            ListingId::new("listing").unwrap(),
            GuestId::new("guest").unwrap(),
            stay,
        )
        .created_at(now)
        .build()
        .unwrap();
        prop_assert!(!reservation.is_stale(now, Duration::hours(ttl_hours)));
    }
}
