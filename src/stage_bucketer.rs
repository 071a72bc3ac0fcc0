//! Stage bucketing: assign time-sorted slices to user-facing stages
//!
//! Each stage selects the slices whose start lies in `[start, end]`. Stage
//! windows are half-open, so when the last selected slice does not strictly
//! overlap the window it is dropped; only that one trailing slice is checked.
//! Overlapping stages each keep their own copy of shared slices.

use crate::config::MetricConfig;
use crate::trace::{Slice, Stage};
use std::collections::HashMap;
use tracing::debug;

/// Slices assigned to one stage title
#[derive(Debug, Clone, PartialEq)]
pub struct StageBucket<'a> {
    pub title: String,
    pub slices: Vec<&'a Slice>,
}

/// Stage title -> assigned slices, in order of first non-empty stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageBuckets<'a> {
    buckets: Vec<StageBucket<'a>>,
    by_title: HashMap<String, usize>,
}

impl<'a> StageBuckets<'a> {
    fn append(&mut self, title: &str, slices: Vec<&'a Slice>) {
        match self.by_title.get(title) {
            Some(&index) => self.buckets[index].slices.extend(slices),
            None => {
                self.by_title
                    .insert(title.to_string(), self.buckets.len());
                self.buckets.push(StageBucket {
                    title: title.to_string(),
                    slices,
                });
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&[&'a Slice]> {
        self.by_title
            .get(title)
            .map(|&index| self.buckets[index].slices.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageBucket<'a>> {
        self.buckets.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Slices belonging to one stage window
///
/// `slices` must be sorted by start time.
pub fn slices_in_stage<'a>(slices: &'a [Slice], stage: &Stage) -> Vec<&'a Slice> {
    let range = stage.range();
    let low = slices.partition_point(|slice| slice.start < range.min);
    let high = slices.partition_point(|slice| slice.start <= range.max);
    if low >= high {
        return Vec::new();
    }

    let mut selected: Vec<&Slice> = slices[low..high].iter().collect();
    if let Some(last) = selected.last() {
        if !range.intersects_exclusive(&last.range()) {
            selected.pop();
        }
    }
    selected
}

/// Bucket time-sorted slices by stage title
///
/// Stages on internal URLs are skipped, and stages that end up with no slices
/// create no bucket. Stages sharing a title concatenate into one bucket.
///
/// # Example
/// ```
/// use runtime_stats::config::MetricConfig;
/// use runtime_stats::stage_bucketer::bucket_slices_by_stage;
/// use runtime_stats::trace::{Slice, Stage};
///
/// let slices = vec![
///     Slice::new(0.0, 5.0, "Parse", 1),
///     Slice::new(10.0, 3.0, "Blink C++", 1),
/// ];
/// let stages = vec![Stage::new("Load", "https://example.com/", 0.0, 10.0)];
///
/// let buckets = bucket_slices_by_stage(&slices, &stages, &MetricConfig::default());
/// assert_eq!(buckets.get("Load").unwrap().len(), 1);
/// ```
pub fn bucket_slices_by_stage<'a>(
    slices: &'a [Slice],
    stages: &[Stage],
    config: &MetricConfig,
) -> StageBuckets<'a> {
    let mut buckets = StageBuckets::default();

    for stage in stages {
        if config.is_internal_url(&stage.url) {
            debug!(title = %stage.title, url = %stage.url, "skipping stage on internal URL");
            continue;
        }

        let selected = slices_in_stage(slices, stage);
        if selected.is_empty() {
            debug!(title = %stage.title, "stage matched no slices");
            continue;
        }

        debug!(
            title = %stage.title,
            slices = selected.len(),
            "assigned slices to stage"
        );
        buckets.append(&stage.title, selected);
    }

    buckets
}
