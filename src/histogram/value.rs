// Histogram value type: a named, unit-tagged sample distribution

use super::bin_boundaries::{BinBoundaries, BinRange};
use super::diagnostics::DiagnosticMap;
use super::running::RunningStatistics;
use serde::{Serialize, Serializer};
use std::fmt;

/// Maximum number of diagnostic maps retained per bin
pub const MAX_DIAGNOSTIC_MAPS: usize = 16;

/// Base measurement unit of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUnit {
    TimeDurationInMs,
    Count,
}

/// Which direction of change counts as an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementDirection {
    DontCare,
    BiggerIsBetter,
    SmallerIsBetter,
}

/// Histogram unit with improvement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub base: BaseUnit,
    pub direction: ImprovementDirection,
}

impl Unit {
    pub const TIME_DURATION_IN_MS_SMALLER_IS_BETTER: Unit = Unit {
        base: BaseUnit::TimeDurationInMs,
        direction: ImprovementDirection::SmallerIsBetter,
    };

    pub const COUNT_SMALLER_IS_BETTER: Unit = Unit {
        base: BaseUnit::Count,
        direction: ImprovementDirection::SmallerIsBetter,
    };
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base {
            BaseUnit::TimeDurationInMs => "ms",
            BaseUnit::Count => "count",
        };
        match self.direction {
            ImprovementDirection::DontCare => write!(f, "{}", base),
            ImprovementDirection::BiggerIsBetter => write!(f, "{}_biggerIsBetter", base),
            ImprovementDirection::SmallerIsBetter => write!(f, "{}_smallerIsBetter", base),
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which summary statistics a histogram reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOptions {
    pub avg: bool,
    pub geometric_mean: bool,
    pub std: bool,
    pub count: bool,
    pub sum: bool,
    pub min: bool,
    pub max: bool,
    pub nans: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            avg: true,
            geometric_mean: false,
            std: true,
            count: true,
            sum: true,
            min: true,
            max: true,
            nans: false,
        }
    }
}

impl SummaryOptions {
    /// Runtime stats histograms report only their average
    pub fn runtime_stats() -> Self {
        Self {
            std: false,
            count: false,
            sum: false,
            min: false,
            max: false,
            ..Self::default()
        }
    }

    /// Enabled statistic names, in reporting order
    pub fn statistics_names(&self) -> Vec<&'static str> {
        [
            ("avg", self.avg),
            ("geometricMean", self.geometric_mean),
            ("std", self.std),
            ("count", self.count),
            ("sum", self.sum),
            ("min", self.min),
            ("max", self.max),
            ("nans", self.nans),
        ]
        .into_iter()
        .filter_map(|(name, enabled)| enabled.then_some(name))
        .collect()
    }
}

/// One bin of a histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub range: BinRange,
    pub count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostic_maps: Vec<DiagnosticMap>,
}

impl HistogramBin {
    fn new(range: BinRange) -> Self {
        Self {
            range,
            count: 0,
            diagnostic_maps: Vec::new(),
        }
    }

    fn add_sample(&mut self, diagnostics: Option<DiagnosticMap>) {
        self.count += 1;
        if let Some(diagnostics) = diagnostics {
            if self.diagnostic_maps.len() < MAX_DIAGNOSTIC_MAPS {
                self.diagnostic_maps.push(diagnostics);
            }
        }
    }
}

/// Named sample distribution with summary statistics and diagnostics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    name: String,
    unit: Unit,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    bin_boundaries: BinBoundaries,
    #[serde(skip_serializing_if = "DiagnosticMap::is_empty")]
    diagnostics: DiagnosticMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    running: Option<RunningStatistics>,
    #[serde(rename = "allBins", serialize_with = "serialize_non_empty_bins")]
    bins: Vec<HistogramBin>,
    num_nans: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nan_diagnostic_maps: Vec<DiagnosticMap>,
    summary_options: SummaryOptions,
}

fn serialize_non_empty_bins<S: Serializer>(
    bins: &[HistogramBin],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        bins.iter()
            .enumerate()
            .filter(|(_, bin)| bin.count > 0)
            .map(|(index, bin)| (index.to_string(), bin)),
    )
}

impl Histogram {
    pub fn new(name: impl Into<String>, unit: Unit, bin_boundaries: BinBoundaries) -> Self {
        let bins = bin_boundaries
            .ranges()
            .iter()
            .copied()
            .map(HistogramBin::new)
            .collect();
        Self {
            name: name.into(),
            unit,
            description: String::new(),
            bin_boundaries,
            diagnostics: DiagnosticMap::new(),
            running: None,
            bins,
            num_nans: 0,
            nan_diagnostic_maps: Vec::new(),
            summary_options: SummaryOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn bin_boundaries(&self) -> &BinBoundaries {
        &self.bin_boundaries
    }

    pub fn diagnostics(&self) -> &DiagnosticMap {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticMap {
        &mut self.diagnostics
    }

    pub fn summary_options(&self) -> &SummaryOptions {
        &self.summary_options
    }

    pub fn set_summary_options(&mut self, options: SummaryOptions) {
        self.summary_options = options;
    }

    /// Add one sample, optionally carrying a diagnostic map
    ///
    /// NaN samples are counted separately and never reach a bin.
    pub fn add_sample(&mut self, value: f64, diagnostics: Option<DiagnosticMap>) {
        if value.is_nan() {
            self.num_nans += 1;
            if let Some(diagnostics) = diagnostics {
                if self.nan_diagnostic_maps.len() < MAX_DIAGNOSTIC_MAPS {
                    self.nan_diagnostic_maps.push(diagnostics);
                }
            }
            return;
        }

        self.running
            .get_or_insert_with(RunningStatistics::new)
            .add(value);
        let index = self.bin_boundaries.bin_index(value);
        self.bins[index].add_sample(diagnostics);
    }

    pub fn num_values(&self) -> u64 {
        self.running.as_ref().map_or(0, RunningStatistics::count)
    }

    pub fn num_nans(&self) -> u64 {
        self.num_nans
    }

    pub fn average(&self) -> Option<f64> {
        self.running.as_ref().and_then(RunningStatistics::mean)
    }

    pub fn standard_deviation(&self) -> Option<f64> {
        self.running.as_ref().and_then(RunningStatistics::stddev)
    }

    pub fn geometric_mean(&self) -> Option<f64> {
        self.running
            .as_ref()
            .and_then(RunningStatistics::geometric_mean)
    }

    pub fn sum(&self) -> f64 {
        self.running.as_ref().map_or(0.0, RunningStatistics::sum)
    }

    pub fn min(&self) -> Option<f64> {
        self.running.as_ref().map(RunningStatistics::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.running.as_ref().map(RunningStatistics::max)
    }

    /// Look up one summary statistic by name
    pub fn statistic(&self, name: &str) -> Option<f64> {
        match name {
            "avg" => self.average(),
            "std" => self.standard_deviation(),
            "geometricMean" => self.geometric_mean(),
            "sum" => Some(self.sum()),
            "min" => self.min(),
            "max" => self.max(),
            "count" => Some(self.num_values() as f64),
            "nans" => Some(self.num_nans as f64),
            _ => None,
        }
    }

    /// All statistics enabled by the summary options that have a value
    pub fn statistics(&self) -> Vec<(&'static str, f64)> {
        self.summary_options
            .statistics_names()
            .into_iter()
            .filter_map(|name| self.statistic(name).map(|value| (name, value)))
            .collect()
    }
}
