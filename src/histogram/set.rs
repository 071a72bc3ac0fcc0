// Histogram store: where emitted histograms land and are looked up by name

use super::bin_boundaries::BinBoundaries;
use super::diagnostics::DiagnosticMap;
use super::value::{Histogram, SummaryOptions, Unit};
use crate::error::{MetricError, Result};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// A single value to record, optionally carrying sample-level diagnostics
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Value(f64),
    WithDiagnostics { value: f64, diagnostics: DiagnosticMap },
}

impl Sample {
    pub fn value(&self) -> f64 {
        match self {
            Sample::Value(value) | Sample::WithDiagnostics { value, .. } => *value,
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Value(value)
    }
}

/// Creation options for a histogram
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    pub bin_boundaries: BinBoundaries,
    pub summary_options: SummaryOptions,
    /// Histogram-level diagnostics (as opposed to per-sample ones)
    pub diagnostics: DiagnosticMap,
    pub description: String,
}

impl HistogramOptions {
    pub fn new(bin_boundaries: BinBoundaries) -> Self {
        Self {
            bin_boundaries,
            summary_options: SummaryOptions::default(),
            diagnostics: DiagnosticMap::new(),
            description: String::new(),
        }
    }

    pub fn with_summary_options(mut self, summary_options: SummaryOptions) -> Self {
        self.summary_options = summary_options;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticMap) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Destination for emitted histograms
pub trait HistogramStore {
    /// Create a histogram holding one sample
    ///
    /// # Errors
    /// Fails with [`MetricError::DuplicateHistogram`] if the name is taken.
    fn create_histogram(
        &mut self,
        name: &str,
        unit: Unit,
        sample: Sample,
        options: HistogramOptions,
    ) -> Result<()>;

    fn histogram(&self, name: &str) -> Option<&Histogram>;

    /// Average of the named histogram, if it exists and has samples
    fn average(&self, name: &str) -> Option<f64> {
        self.histogram(name).and_then(Histogram::average)
    }
}

/// In-memory, insertion-ordered histogram store
#[derive(Debug, Default)]
pub struct HistogramSet {
    histograms: Vec<Histogram>,
    by_name: HashMap<String, usize>,
}

impl HistogramSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Histogram> {
        self.histograms.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histograms.iter().map(Histogram::name)
    }

    /// Add an already built histogram
    pub fn add_histogram(&mut self, histogram: Histogram) -> Result<()> {
        if self.by_name.contains_key(histogram.name()) {
            return Err(MetricError::DuplicateHistogram {
                name: histogram.name().to_string(),
            });
        }
        self.by_name
            .insert(histogram.name().to_string(), self.histograms.len());
        self.histograms.push(histogram);
        Ok(())
    }
}

impl HistogramStore for HistogramSet {
    fn create_histogram(
        &mut self,
        name: &str,
        unit: Unit,
        sample: Sample,
        options: HistogramOptions,
    ) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(MetricError::DuplicateHistogram {
                name: name.to_string(),
            });
        }

        let mut histogram = Histogram::new(name, unit, options.bin_boundaries);
        histogram.set_summary_options(options.summary_options);
        histogram.set_description(options.description);
        *histogram.diagnostics_mut() = options.diagnostics;
        match sample {
            Sample::Value(value) => histogram.add_sample(value, None),
            Sample::WithDiagnostics { value, diagnostics } => {
                histogram.add_sample(value, Some(diagnostics))
            }
        }

        self.add_histogram(histogram)
    }

    fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.by_name.get(name).map(|&index| &self.histograms[index])
    }
}

impl Serialize for HistogramSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.histograms)
    }
}
