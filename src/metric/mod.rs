// Runtime stats metric: two-pass breakdown of runtime call stats
//
// Pass 1 buckets slices by stage and emits stage-scoped histograms for every
// category, returning the emitted names. Pass 2 aggregates the whole trace
// independently and emits total histograms whose breakdowns are sourced from
// the pass 1 names.

use crate::config::MetricConfig;
use crate::derived::{DerivedMetrics, TOTAL_MAIN_THREAD, V8_ONLY, V8_ONLY_MAIN_THREAD};
use crate::emitter::HistogramEmitter;
use crate::error::{MetricError, Result};
use crate::histogram::HistogramStore;
use crate::names::StageHistogramNames;
use crate::runtime_group::{RuntimeGroupCollection, BLINK_RCS_CATEGORY, UNCLASSIFIED_SUBCATEGORY};
use crate::stage_bucketer::{bucket_slices_by_stage, StageBuckets};
use crate::trace::{Slice, Stage};
use std::collections::HashSet;
use tracing::debug;

/// One category's aggregated time (microseconds) and count
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryValue {
    pub category: String,
    pub time: f64,
    pub count: u64,
}

/// Every category emitted for a collection
///
/// Top-level groups first, then the Blink RCS breakdown when it has time,
/// then the derived categories.
pub fn category_values(collection: &RuntimeGroupCollection) -> Vec<CategoryValue> {
    let mut values: Vec<CategoryValue> = collection
        .groups()
        .iter()
        .map(|group| CategoryValue {
            category: group.name.clone(),
            time: group.time,
            count: group.count,
        })
        .collect();

    if let Some(blink) = collection.blink_rcs().filter(|b| b.total_time() > 0.0) {
        values.extend(blink.groups().iter().map(|group| CategoryValue {
            category: group.name.clone(),
            time: group.time,
            count: group.count,
        }));
    }

    let derived = DerivedMetrics::compute(collection);
    values.extend(derived.entries().iter().map(|(name, value)| CategoryValue {
        category: (*name).to_string(),
        time: value.time,
        count: value.count,
    }));

    values
}

/// Reject traces whose category labels would emit the same histogram twice
///
/// Top-level categories, Blink RCS sub-labels and the derived categories
/// share one name space per scope. A top-level category may not be named
/// like a derived category, and a Blink RCS sub-label (including the
/// fallback for unlabeled slices) may not match either.
pub fn check_category_names(slices: &[Slice]) -> Result<()> {
    let derived = [V8_ONLY, TOTAL_MAIN_THREAD, V8_ONLY_MAIN_THREAD];
    let top_level: HashSet<&str> = slices.iter().map(|s| s.category.as_str()).collect();

    if let Some(name) = derived.iter().find(|name| top_level.contains(*name)) {
        return Err(MetricError::CategoryCollision {
            name: (*name).to_string(),
            reason: "top-level category shadows a derived category".to_string(),
        });
    }

    for slice in slices.iter().filter(|s| s.category == BLINK_RCS_CATEGORY) {
        let label = slice
            .subcategory
            .as_deref()
            .unwrap_or(UNCLASSIFIED_SUBCATEGORY);
        let reason = if top_level.contains(label) {
            "Blink RCS sub-label matches a top-level category"
        } else if derived.contains(&label) {
            "Blink RCS sub-label matches a derived category"
        } else {
            continue;
        };
        return Err(MetricError::CategoryCollision {
            name: label.to_string(),
            reason: reason.to_string(),
        });
    }
    Ok(())
}

/// Pass 1: emit stage-scoped histograms for every bucket
///
/// Returns the emitted histogram names for pass 2.
pub fn compute_stage_histograms<S: HistogramStore + ?Sized>(
    store: &mut S,
    buckets: &StageBuckets<'_>,
    config: &MetricConfig,
) -> Result<StageHistogramNames> {
    let mut names = StageHistogramNames::default();
    let mut emitter = HistogramEmitter::new(store, config)?;

    for bucket in buckets.iter() {
        let collection = RuntimeGroupCollection::from_slices(bucket.slices.iter().copied())?;
        let values = category_values(&collection);
        debug!(
            stage = %bucket.title,
            slices = bucket.slices.len(),
            categories = values.len(),
            "emitting stage histograms"
        );

        for value in &values {
            emitter.emit_stage(
                &bucket.title,
                &value.category,
                value.time,
                value.count,
                &mut names,
            )?;
        }
    }

    Ok(names)
}

/// Pass 2: emit total histograms over the whole trace
pub fn compute_total_histograms<S: HistogramStore + ?Sized>(
    store: &mut S,
    slices: &[Slice],
    names: &StageHistogramNames,
    config: &MetricConfig,
) -> Result<()> {
    let mut emitter = HistogramEmitter::new(store, config)?;
    let collection = RuntimeGroupCollection::from_slices(slices)?;
    let values = category_values(&collection);
    debug!(
        slices = slices.len(),
        categories = values.len(),
        "emitting total histograms"
    );

    for value in &values {
        emitter.emit_total(&value.category, value.time, value.count, names)?;
    }
    Ok(())
}

/// What one computation produced
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeStatsSummary {
    /// Stage titles that received histograms, in bucket order
    pub stages: Vec<String>,
    /// Names emitted by the stage pass
    pub stage_names: StageHistogramNames,
}

/// Run the full runtime stats breakdown over a trace
///
/// Slices are sorted by start time (stable for equal starts) before
/// bucketing; the caller's order does not matter. Category names are
/// checked with [`check_category_names`] before anything is emitted.
///
/// # Example
/// ```
/// use runtime_stats::config::MetricConfig;
/// use runtime_stats::histogram::{HistogramSet, HistogramStore};
/// use runtime_stats::metric::compute_runtime_stats;
/// use runtime_stats::trace::{Slice, Stage};
///
/// let slices = vec![
///     Slice::new(0.0, 5.0, "Parse", 1),
///     Slice::new(10.0, 3.0, "Blink C++", 1),
/// ];
/// let stages = vec![Stage::new("Load", "https://example.com/", 0.0, 10.0)];
///
/// let mut store = HistogramSet::new();
/// compute_runtime_stats(&mut store, &slices, &stages, &MetricConfig::default()).unwrap();
///
/// assert_eq!(store.average("Load_Parse:duration"), Some(0.005));
/// assert_eq!(store.average("V8-Only:duration"), Some(0.005));
/// ```
pub fn compute_runtime_stats<S: HistogramStore + ?Sized>(
    store: &mut S,
    slices: &[Slice],
    stages: &[Stage],
    config: &MetricConfig,
) -> Result<RuntimeStatsSummary> {
    config.validate()?;
    check_category_names(slices)?;

    let mut sorted = slices.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let buckets = bucket_slices_by_stage(&sorted, stages, config);
    let stage_names = compute_stage_histograms(store, &buckets, config)?;
    compute_total_histograms(store, &sorted, &stage_names, config)?;

    Ok(RuntimeStatsSummary {
        stages: buckets.titles().map(str::to_string).collect(),
        stage_names,
    })
}
