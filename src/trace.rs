//! Trace input model: runtime call stats slices and user-facing stages
//!
//! Times are microseconds, as recorded by the trace.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A closed time interval `[min, max]` in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True if `x` lies within `[min, max]`, both ends included
    pub fn contains_inclusive(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Strict overlap test: shared endpoints do not count
    pub fn intersects_exclusive(&self, other: &TimeRange) -> bool {
        self.min < other.max && self.max > other.min
    }

    pub fn duration(&self) -> f64 {
        self.max - self.min
    }
}

/// One recorded runtime call stats execution slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Start timestamp (microseconds)
    pub start: f64,
    /// Duration (microseconds)
    pub duration: f64,
    /// Runtime group label (e.g., "Parse", "Blink C++", "Compile-Background")
    pub category: String,
    /// Number of calls folded into this slice
    pub count: u64,
    /// Finer label used only for "Blink RCS" slices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl Slice {
    pub fn new(start: f64, duration: f64, category: impl Into<String>, count: u64) -> Self {
        Self {
            start,
            duration,
            category: category.into(),
            count,
            subcategory: None,
        }
    }

    /// Attach a Blink RCS sub-label
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.start + self.duration)
    }
}

/// A named window of user-visible activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage title; stages sharing a title share one bucket
    pub title: String,
    /// Document URL the stage was recorded against
    pub url: String,
    /// Window start (microseconds)
    pub start: f64,
    /// Window end (microseconds), exclusive
    pub end: f64,
}

impl Stage {
    pub fn new(title: impl Into<String>, url: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            start,
            end,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Complete input to one metric computation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceInput {
    #[serde(default)]
    pub slices: Vec<Slice>,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl TraceInput {
    /// Parse trace input from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse trace input JSON")
    }

    /// Load trace input from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read trace input: {}", path.as_ref().display())
        })?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_both_ends() {
        let range = TimeRange::new(0.0, 10.0);
        assert!(range.contains_inclusive(0.0));
        assert!(range.contains_inclusive(10.0));
        assert!(!range.contains_inclusive(10.5));
        assert!(!range.contains_inclusive(-0.1));
    }

    #[test]
    fn test_intersects_exclusive_shared_endpoint() {
        let stage = TimeRange::new(0.0, 10.0);
        assert!(!stage.intersects_exclusive(&TimeRange::new(10.0, 13.0)));
        assert!(stage.intersects_exclusive(&TimeRange::new(9.0, 13.0)));
        assert!(!stage.intersects_exclusive(&TimeRange::new(-5.0, 0.0)));
    }

    #[test]
    fn test_zero_duration_slice_range() {
        let slice = Slice::new(4.0, 0.0, "GC", 1);
        assert_eq!(slice.range().duration(), 0.0);
    }

    #[test]
    fn test_trace_input_from_json() {
        let json = r#"{
            "slices": [
                {"start": 0, "duration": 5, "category": "Parse", "count": 1},
                {"start": 6, "duration": 2, "category": "Blink RCS", "count": 3, "subcategory": "Blink_Layout"}
            ],
            "stages": [
                {"title": "Load", "url": "https://example.com/", "start": 0, "end": 10}
            ]
        }"#;

        let input = TraceInput::from_json_str(json).unwrap();
        assert_eq!(input.slices.len(), 2);
        assert_eq!(input.slices[1].subcategory.as_deref(), Some("Blink_Layout"));
        assert_eq!(input.stages[0].range(), TimeRange::new(0.0, 10.0));
    }

    #[test]
    fn test_trace_input_rejects_malformed_json() {
        let err = TraceInput::from_json_str("{\"slices\": [1, 2]}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse trace input"));
    }

    #[test]
    fn test_trace_input_missing_file() {
        let err = TraceInput::from_file("/nonexistent/trace.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read trace input"));
    }
}
