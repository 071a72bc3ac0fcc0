//! Property-based tests for stage bucketing and derived categories
//!
//! Durations are whole microseconds so sums and differences stay exact.

use proptest::prelude::*;
use runtime_stats::config::MetricConfig;
use runtime_stats::derived::DerivedMetrics;
use runtime_stats::histogram::HistogramSet;
use runtime_stats::metric::compute_runtime_stats;
use runtime_stats::runtime_group::RuntimeGroupCollection;
use runtime_stats::stage_bucketer::{bucket_slices_by_stage, slices_in_stage};
use runtime_stats::trace::{Slice, Stage};

const CATEGORIES: &[&str] = &[
    "Parse",
    "IC",
    "Blink C++",
    "GC Background",
    "Compile-Background",
    "Blink RCS",
];

fn arb_slice() -> impl Strategy<Value = Slice> {
    (
        0u32..10_000,
        1u32..500,
        prop::sample::select(CATEGORIES),
        0u64..20,
    )
        .prop_map(|(start, duration, category, count)| {
            Slice::new(f64::from(start), f64::from(duration), category, count)
        })
}

fn sorted(mut slices: Vec<Slice>) -> Vec<Slice> {
    slices.sort_by(|a, b| a.start.total_cmp(&b.start));
    slices
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_derived_categories_subtract_exactly(
        slices in prop::collection::vec(arb_slice(), 0..40),
    ) {
        // Property: each derived value is the total minus its excluded groups
        let collection = RuntimeGroupCollection::from_slices(&slices).unwrap();
        let derived = DerivedMetrics::compute(&collection);

        let sum_time = |pred: &dyn Fn(&str) -> bool| -> f64 {
            slices.iter().filter(|s| pred(&s.category)).map(|s| s.duration).sum()
        };
        let total = sum_time(&|_| true);
        let blink_cpp = sum_time(&|c| c == "Blink C++");
        let background = sum_time(&|c| c.contains("Background"));

        prop_assert_eq!(collection.total_time(), total);
        prop_assert_eq!(derived.v8_only.time, total - blink_cpp);
        prop_assert_eq!(derived.total_main_thread.time, total - background);
        prop_assert_eq!(
            derived.v8_only_main_thread.time,
            total - blink_cpp - background
        );
        prop_assert_eq!(
            derived.v8_only_main_thread.count + collection.total_count(),
            derived.v8_only.count + derived.total_main_thread.count
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_slice_starting_on_stage_end_is_excluded(
        inner in prop::collection::vec(arb_slice(), 0..20),
        trailing_duration in 1u32..100,
    ) {
        // Property: the last slice starting exactly on the stage end never lands in the stage
        let end = 10_000.0;
        let mut slices: Vec<Slice> = inner
            .into_iter()
            .map(|mut s| {
                s.start = s.start.min(end - 1.0);
                s
            })
            .collect();
        slices.push(Slice::new(end, f64::from(trailing_duration), "Parse", 1));
        let slices = sorted(slices);
        let stage = Stage::new("Load", "https://example.com/", 0.0, end);

        let selected = slices_in_stage(&slices, &stage);
        prop_assert_eq!(selected.len(), slices.len() - 1);
        prop_assert!(selected.iter().all(|s| s.start < end));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_selected_slices_start_within_stage(
        slices in prop::collection::vec(arb_slice(), 0..40),
        start in 0u32..8_000,
        length in 0u32..4_000,
    ) {
        // Property: bucketing never picks a slice that starts outside the stage
        let slices = sorted(slices);
        let stage = Stage::new(
            "Scroll",
            "https://example.com/",
            f64::from(start),
            f64::from(start + length),
        );
        let range = stage.range();

        let selected = slices_in_stage(&slices, &stage);
        let candidates = slices
            .iter()
            .filter(|s| range.contains_inclusive(s.start))
            .count();
        prop_assert!(selected.iter().all(|s| range.contains_inclusive(s.start)));
        prop_assert!(selected.len() == candidates || selected.len() + 1 == candidates);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_overlapping_stages_share_slices(
        slices in prop::collection::vec(arb_slice(), 1..40),
        start in 0u32..5_000,
        length in 1u32..5_000,
    ) {
        // Property: stages covering the same window receive the same slices
        let slices = sorted(slices);
        let (min, max) = (f64::from(start), f64::from(start + length));
        let stages = vec![
            Stage::new("Load", "https://example.com/", min, max),
            Stage::new("Response", "https://example.com/", min, max),
        ];

        let buckets = bucket_slices_by_stage(&slices, &stages, &MetricConfig::default());
        prop_assert_eq!(buckets.get("Load"), buckets.get("Response"));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_computation_is_deterministic(
        slices in prop::collection::vec(arb_slice(), 0..30),
        boundary in 1u32..10_000,
    ) {
        // Property: identical input produces identical histogram output
        let stages = vec![
            Stage::new("Load", "https://example.com/", 0.0, f64::from(boundary)),
            Stage::new("Animation", "https://example.com/", f64::from(boundary), 10_500.0),
        ];
        let config = MetricConfig::default();

        let mut first = HistogramSet::new();
        let mut second = HistogramSet::new();
        compute_runtime_stats(&mut first, &slices, &stages, &config).unwrap();
        compute_runtime_stats(&mut second, &slices, &stages, &config).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // Totals always include the derived categories
        prop_assert!(first.names().any(|n| n == "V8-Only:duration"));
        prop_assert!(first.names().any(|n| n == "V8-Only-Main-Thread:count"));
    }
}
