//! Property-based tests for eligibility, rolling-window and tier invariants.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use ct_common::{Event, EventType, Tier};
use ct_config::TierThresholds;
use ct_core::eligibility::apply_eligibility;
use ct_core::window::partition_counts;
use ct_core::{classify, member_rates, rolling_counts, rolling_counts_parallel};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
}

fn event_type_strategy() -> impl Strategy<Value = EventType> {
    prop_oneof![
        Just(EventType::Admission),
        Just(EventType::EdVisit),
        Just(EventType::PcpVisit),
    ]
}

fn event_strategy() -> impl Strategy<Value = Event> {
    (0u8..6, event_type_strategy(), 0i64..1200).prop_map(|(member, kind, offset)| {
        let day = base() + Duration::days(offset);
        Event::new(format!("M{member}"), kind, day, day)
    })
}

fn sorted_dates_strategy() -> impl Strategy<Value = Vec<NaiveDate>> {
    prop::collection::vec(0i64..1500, 0..60).prop_map(|mut offsets| {
        offsets.sort_unstable();
        offsets
            .into_iter()
            .map(|o| base() + Duration::days(o))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn rolling_count_is_bounded_by_partition_size(dates in sorted_dates_strategy(), window in 0u32..800) {
        let counts = partition_counts(&dates, window);
        prop_assert_eq!(counts.len(), dates.len());
        for &c in &counts {
            prop_assert!(c >= 1);
            prop_assert!(c as usize <= dates.len());
        }
    }

    #[test]
    fn rolling_count_matches_brute_force(dates in sorted_dates_strategy(), window in 0u32..800) {
        let counts = partition_counts(&dates, window);
        for (i, day) in dates.iter().enumerate() {
            let expected = dates
                .iter()
                .filter(|d| **d <= *day && (*day - **d).num_days() <= i64::from(window))
                .count();
            prop_assert_eq!(counts[i] as usize, expected);
        }
    }

    #[test]
    fn appending_a_later_event_keeps_prior_counts(dates in sorted_dates_strategy(), gap in 1i64..400) {
        let before = partition_counts(&dates, 364);
        let mut extended = dates.clone();
        let last = dates.last().copied().unwrap_or_else(base);
        extended.push(last + Duration::days(gap));
        let after = partition_counts(&extended, 364);
        prop_assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn parallel_agrees_with_sequential(events in prop::collection::vec(event_strategy(), 0..200), workers in 1usize..9) {
        prop_assert_eq!(
            rolling_counts_parallel(&events, 364, workers),
            rolling_counts(&events, 364)
        );
    }

    #[test]
    fn excluded_members_leave_no_trace(events in prop::collection::vec(event_strategy(), 0..200), cutoff_offset in 0i64..1200) {
        let cutoff = base() + Duration::days(cutoff_offset);
        let result = apply_eligibility(&events, cutoff);
        for event in &events {
            let disqualified = event.event_type == EventType::Admission && event.start_date >= cutoff;
            if disqualified {
                prop_assert!(!result.is_eligible(&event.member_id));
            }
        }
        for event in &result.events {
            prop_assert!(!result.excluded_members.contains(&event.member_id));
        }
        prop_assert!(result.eligible_members.is_disjoint(&result.excluded_members));
    }

    #[test]
    fn ed_rate_is_zero_iff_no_ed_visits(events in prop::collection::vec(event_strategy(), 0..200)) {
        let result = apply_eligibility(&events, base() + Duration::days(10_000));
        let records = rolling_counts(&result.events, 364);
        let rates = member_rates(&result.eligible_members, &records, EventType::EdVisit);
        prop_assert_eq!(rates.len(), result.eligible_members.len());

        let mut ed_per_member: BTreeMap<&str, usize> = BTreeMap::new();
        for e in result.events.iter().filter(|e| e.event_type == EventType::EdVisit) {
            *ed_per_member.entry(e.member_id.as_str()).or_insert(0) += 1;
        }
        for rate in &rates {
            let ed_events = ed_per_member.get(rate.member_id.as_str()).copied().unwrap_or(0);
            prop_assert_eq!(rate.ed_rate == 0, ed_events == 0);
            prop_assert!(rate.ed_rate as usize <= ed_events);
        }
    }

    #[test]
    fn classification_is_total_and_monotone(rate in 0u32..50, tier2 in 0u32..20, extra in 0u32..20) {
        let thresholds = TierThresholds { tier1: tier2 + extra, tier2 };
        let tier = classify(rate, &thresholds);
        let expected = if rate >= thresholds.tier1 {
            Tier::Tier1
        } else if rate >= thresholds.tier2 {
            Tier::Tier2
        } else {
            Tier::Low
        };
        prop_assert_eq!(tier, expected);
        prop_assert!(classify(rate + 1, &thresholds) >= tier);
    }
}
