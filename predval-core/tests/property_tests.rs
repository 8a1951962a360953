//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Incremental sliding averages equal the naive per-window recomputation
//! 2. Matched count equals the number of actual records with a prediction
//! 3. Hours without actual records aggregate to zero
//! 4. At `max_hour = window + 1` the first sliding window equals the direct sum

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

use predval_core::reference::naive_window_averages;
use predval_core::{
    parse_record, ErrorSeries, HourAggregate, ParseOptions, PredictionIndex, PriceConversion,
    Window, WindowAverages,
};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_aggregate() -> impl Strategy<Value = HourAggregate> {
    prop_oneof![
        Just(HourAggregate::ZERO),
        (1..6u64, 0..5_000u64).prop_map(|(c, e)| HourAggregate::new(c, u128::from(e))),
    ]
}

fn arb_series() -> impl Strategy<Value = ErrorSeries> {
    prop::collection::vec(arb_aggregate(), 0..80).prop_map(ErrorSeries::from_aggregates)
}

fn arb_window() -> impl Strategy<Value = Window> {
    (1..25i64).prop_map(|w| Window::new(w).unwrap())
}

fn arb_price() -> impl Strategy<Value = String> {
    (0..50_000u32).prop_map(|c| format!("{}.{:02}", c / 100, c % 100))
}

/// `(hour, asset, price)` triples rendered as input lines.
fn arb_lines(max_hour: u64) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (0..=max_hour, prop::sample::select(vec!["A", "B", "C", "D"]), arb_price()),
        0..60,
    )
    .prop_map(|records| {
        records
            .into_iter()
            .map(|(h, a, p)| format!("{h}|{a}|{p}"))
            .collect()
    })
}

fn sorted_by_hour(mut lines: Vec<String>) -> Vec<String> {
    lines.sort_by_key(|l| parse_record(l, PriceConversion::Truncate).unwrap().hour);
    lines
}

// ── 1. Incremental == naive ──────────────────────────────────────────

proptest! {
    #[test]
    fn incremental_matches_naive(series in arb_series(), window in arb_window()) {
        let fast: Vec<_> = WindowAverages::new(&series, window).collect();
        let slow = naive_window_averages(&series, window);
        prop_assert_eq!(fast, slow);
    }

    #[test]
    fn window_positions_are_contiguous(series in arb_series(), window in arb_window()) {
        let results: Vec<_> = WindowAverages::new(&series, window).collect();
        prop_assert!(!results.is_empty());
        prop_assert_eq!(results[0].window_start, 1);
        for pair in results.windows(2) {
            prop_assert_eq!(pair[1].window_start, pair[0].window_start + 1);
        }
        if results.len() > 1 {
            let last = results.last().unwrap();
            prop_assert_eq!(last.window_end, series.max_hour());
            prop_assert_eq!(last.window_end - last.window_start + 1, window.hours());
        }
    }
}

// ── 2 & 3. Series accounting ─────────────────────────────────────────

proptest! {
    #[test]
    fn matched_count_equals_brute_force(
        predicted in arb_lines(20),
        actual in arb_lines(20).prop_map(sorted_by_hour),
    ) {
        let opts = ParseOptions::default();
        let index = PredictionIndex::build(&predicted, &opts).unwrap();
        let series = ErrorSeries::build(&actual, &index, &opts).unwrap();

        let mut lookup: HashMap<(u64, String), i64> = HashMap::new();
        for line in &predicted {
            let r = parse_record(line, PriceConversion::Truncate).unwrap();
            lookup.insert((r.hour, r.asset), r.price);
        }
        let mut expected_count = 0u64;
        let mut expected_error = 0u128;
        for line in &actual {
            let r = parse_record(line, PriceConversion::Truncate).unwrap();
            if let Some(p) = lookup.get(&(r.hour, r.asset.clone())) {
                expected_count += 1;
                expected_error += u128::from(r.price.abs_diff(*p));
            }
        }

        prop_assert_eq!(series.matched(), expected_count);
        prop_assert_eq!(series.total().error_sum, expected_error);
        prop_assert_eq!(series.records_seen(), actual.len() as u64);
    }

    #[test]
    fn hours_without_actual_records_are_zero(
        predicted in arb_lines(30),
        actual in arb_lines(30).prop_map(sorted_by_hour),
    ) {
        let opts = ParseOptions::default();
        let index = PredictionIndex::build(&predicted, &opts).unwrap();
        let series = ErrorSeries::build(&actual, &index, &opts).unwrap();

        let actual_hours: BTreeSet<u64> = actual
            .iter()
            .map(|l| parse_record(l, PriceConversion::Truncate).unwrap().hour)
            .collect();
        let expected_max = actual_hours.iter().next_back().copied().unwrap_or(0);

        prop_assert_eq!(series.max_hour(), expected_max);
        for (hour, agg) in series.iter() {
            if !actual_hours.contains(&hour) {
                prop_assert_eq!(*agg, HourAggregate::ZERO, "hour {}", hour);
            }
        }
    }
}

// ── 4. Regime boundary ───────────────────────────────────────────────

proptest! {
    #[test]
    fn boundary_window_equals_direct_sum(
        window in arb_window(),
        seed in prop::collection::vec(arb_aggregate(), 30),
    ) {
        let len = window.hours() as usize;
        // max_hour = window + 1 -> len + 2 hours including hour 0
        let hours: Vec<HourAggregate> = seed.iter().cycle().take(len + 2).copied().collect();
        let series = ErrorSeries::from_aggregates(hours.clone());
        prop_assert_eq!(series.max_hour(), window.hours() + 1);

        let first = WindowAverages::new(&series, window).next().unwrap();
        let direct: HourAggregate = hours[1..=len].iter().sum();
        prop_assert_eq!(first.window_start, 1);
        prop_assert_eq!(first.window_end, window.hours());
        prop_assert_eq!(first.average_error, direct.average());
    }
}
