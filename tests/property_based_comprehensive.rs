//! Property-based tests for the lifecycle accumulator and report join
//!
//! Core properties covered:
//! 1. Alternating CREATE/DESTROY sequences sum to the closed intervals
//! 2. Trailing open intervals are closed at the window end without errors
//! 3. Anomalies add exactly one error and keep durations non-negative
//! 4. Restart intervals are classified by the kind of the prior destroy
//! 5. Input order never matters once events are placed in a trace
//! 6. Joined rows follow the inventory one to one

use lifetrace::event::{ComponentId, EventKind, EventTrace, LifecycleEvent};
use lifetrace::inventory::PackageInventoryEntry;
use lifetrace::lifecycle_index::LifecycleIndex;
use lifetrace::report::{age_in_days, UsageJoin};
use lifetrace::stats::{percent_of, ComponentStat};
use lifetrace::usage::UsageHistoryIndex;
use proptest::prelude::*;

const COMPONENT: &str = "app.foo/Service";

/// Strictly increasing timestamps: (create, destroy) pairs built from positive gaps
fn intervals() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((1i64..10_000, 1i64..10_000), 1..40).prop_map(|gaps| {
        let mut ts = 0i64;
        gaps.into_iter()
            .map(|(idle, run)| {
                let create = ts + idle;
                let destroy = create + run;
                ts = destroy;
                (create, destroy)
            })
            .collect()
    })
}

fn accumulate(events: &[(i64, EventKind)], end_ts: i64) -> ComponentStat {
    let mut stat = ComponentStat::new(ComponentId::parse(COMPONENT));
    for &(ts, kind) in events {
        stat.record(&LifecycleEvent::new(ts, kind, COMPONENT));
    }
    stat.finish(end_ts);
    stat
}

fn alternating(pairs: &[(i64, i64)]) -> Vec<(i64, EventKind)> {
    pairs
        .iter()
        .flat_map(|&(c, d)| [(c, EventKind::Create), (d, EventKind::Destroy)])
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_alternating_totals(pairs in intervals()) {
        let end = pairs.last().map(|&(_, d)| d).unwrap_or(0);
        let stat = accumulate(&alternating(&pairs), end);

        let total: u64 = pairs.iter().map(|&(c, d)| (d - c) as u64).sum();
        let max: u64 = pairs.iter().map(|&(c, d)| (d - c) as u64).max().unwrap_or(0);
        prop_assert_eq!(stat.total_time, total);
        prop_assert_eq!(stat.max_time, max);
        prop_assert_eq!(stat.errors, 0);
        prop_assert_eq!(stat.count, pairs.len() as u64);
        prop_assert_eq!(stat.restart_count, pairs.len() as u64 - 1);
        prop_assert!(stat.count >= stat.restart_count + stat.bg_kill_restart_count);
    }

    #[test]
    fn prop_trailing_create_closed_at_end(pairs in intervals(), open in 0i64..5_000, tail in 0i64..5_000) {
        let last = pairs.last().map(|&(_, d)| d).unwrap_or(0);
        let mut events = alternating(&pairs);
        let create = last + open;
        events.push((create, EventKind::Create));
        let end = create + tail;

        let closed: u64 = pairs.iter().map(|&(c, d)| (d - c) as u64).sum();
        let stat = accumulate(&events, end);
        prop_assert_eq!(stat.total_time, closed + tail as u64);
        prop_assert!(stat.max_time >= tail as u64);
        prop_assert_eq!(stat.errors, 0);
    }

    #[test]
    fn prop_double_create_single_error(first in 0i64..10_000, gap in 0i64..10_000, run in 0i64..10_000) {
        let second = first + gap;
        let stat = accumulate(
            &[
                (first, EventKind::Create),
                (second, EventKind::Create),
                (second + run, EventKind::Destroy),
            ],
            second + run,
        );
        prop_assert_eq!(stat.errors, 1);
        prop_assert_eq!(stat.total_time, (gap + run) as u64);
        prop_assert_eq!(stat.max_time, gap.max(run) as u64);
    }

    #[test]
    fn prop_stray_destroy_keeps_times(pairs in intervals(), stray_gap in 1i64..5_000) {
        let last = pairs.last().map(|&(_, d)| d).unwrap_or(0);
        let clean = accumulate(&alternating(&pairs), last + stray_gap);

        let mut events = alternating(&pairs);
        events.push((last + stray_gap, EventKind::Destroy));
        let noisy = accumulate(&events, last + stray_gap);

        prop_assert_eq!(noisy.errors, clean.errors + 1);
        prop_assert_eq!(noisy.total_time, clean.total_time);
        prop_assert_eq!(noisy.max_time, clean.max_time);
    }

    #[test]
    fn prop_restart_classified_by_destroy_kind(
        t1 in 0i64..1_000,
        run in 0i64..1_000,
        gap in 0i64..1_000,
        killed in any::<bool>(),
    ) {
        let t2 = t1 + run;
        let t3 = t2 + gap;
        let kind = if killed { EventKind::DestroyLowMemoryKill } else { EventKind::Destroy };
        let stat = accumulate(&[(t1, EventKind::Create), (t2, kind), (t3, EventKind::Create)], t3);

        if killed {
            prop_assert_eq!(stat.bg_kill_restart_count, 1);
            prop_assert_eq!(stat.total_bg_kill_restart_time, gap as u64);
            prop_assert_eq!(stat.restart_count, 0);
        } else {
            prop_assert_eq!(stat.restart_count, 1);
            prop_assert_eq!(stat.total_restart_time, gap as u64);
            prop_assert_eq!(stat.bg_kill_restart_count, 0);
        }
    }

    #[test]
    fn prop_trace_order_independent(pairs in intervals(), seed in any::<u64>()) {
        let events: Vec<LifecycleEvent> = alternating(&pairs)
            .into_iter()
            .map(|(ts, kind)| LifecycleEvent::new(ts, kind, COMPONENT))
            .collect();
        let end = pairs.last().map(|&(_, d)| d).unwrap_or(0);

        // Deterministic rotation plus reversal stands in for a shuffle
        let mut scrambled = events.clone();
        let len = scrambled.len();
        scrambled.rotate_left((seed as usize) % len);
        scrambled.reverse();

        let ordered = LifecycleIndex::build(&EventTrace::new(0, end, events));
        let shuffled = LifecycleIndex::build(&EventTrace::new(0, end, scrambled));
        let a = ordered.get(COMPONENT).unwrap();
        let b = shuffled.get(COMPONENT).unwrap();
        prop_assert_eq!(a.total_time, b.total_time);
        prop_assert_eq!(a.max_time, b.max_time);
        prop_assert_eq!(a.restart_count, b.restart_count);
        prop_assert_eq!(a.errors, b.errors);
    }

    #[test]
    fn prop_percent_matches_integer_division(part in 0u64..1_000_000, whole in 1i64..1_000_000) {
        let pct = percent_of(part, whole).unwrap();
        prop_assert_eq!(pct, (part as i64 * 100) / whole);
        prop_assert_eq!(percent_of(part, 0), None);
    }

    #[test]
    fn prop_age_in_days_floors(now in 0i64..10_000_000_000_000, back in 0i64..10_000_000_000) {
        let age = age_in_days(now, now - back).unwrap();
        prop_assert!(age >= 0);
        prop_assert_eq!(age, back / 86_400_000);
    }

    #[test]
    fn prop_join_row_per_inventory_entry(
        names in prop::collection::btree_set("[a-z]{1,8}\\.[a-z]{1,8}", 1..20),
    ) {
        let trace = EventTrace::new(0, 100, vec![LifecycleEvent::new(0, EventKind::Create, "x.y/Z")]);
        let index = LifecycleIndex::build(&trace);
        let usage = UsageHistoryIndex::default();
        let inventory: Vec<PackageInventoryEntry> = names
            .iter()
            .map(|n| PackageInventoryEntry::new(n.as_str(), false))
            .collect();

        let rows = UsageJoin::new(Some(&index), &usage).rows(&inventory, 0).unwrap();
        prop_assert_eq!(rows.len(), inventory.len());
        for (row, pkg) in rows.iter().zip(&inventory) {
            prop_assert_eq!(&row.package, &pkg.name);
            prop_assert!(row.last_used.is_none());
        }
    }
}
