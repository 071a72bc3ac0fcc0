//! Histogram emission for runtime stats categories
//!
//! Every (scope, category) pair produces a duration histogram and a count
//! histogram. Stage-scoped histograms carry a plain sample and are recorded in
//! the name registry; total histograms attach a breakdown of the per-stage
//! averages plus the per-stage histogram names they were sourced from.

use crate::config::MetricConfig;
use crate::error::Result;
use crate::histogram::{
    BinBoundaries, Breakdown, Diagnostic, DiagnosticMap, HistogramOptions, HistogramStore,
    RelatedNameMap, Sample, SummaryOptions, Unit,
};
use crate::names::{NameRegistry, StageHistogramNames};
use tracing::warn;

/// Which of the two per-category histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Duration,
    Count,
}

impl MetricKind {
    fn suffix(self) -> &'static str {
        match self {
            MetricKind::Duration => "duration",
            MetricKind::Count => "count",
        }
    }

    fn unit(self) -> Unit {
        match self {
            MetricKind::Duration => Unit::TIME_DURATION_IN_MS_SMALLER_IS_BETTER,
            MetricKind::Count => Unit::COUNT_SMALLER_IS_BETTER,
        }
    }
}

/// Histogram name for a category, either stage-scoped or total
///
/// # Example
/// ```
/// use runtime_stats::emitter::{histogram_name, MetricKind};
///
/// assert_eq!(histogram_name(Some("Load"), "Parse", MetricKind::Duration), "Load_Parse:duration");
/// assert_eq!(histogram_name(None, "Parse", MetricKind::Count), "Parse:count");
/// ```
pub fn histogram_name(stage: Option<&str>, category: &str, kind: MetricKind) -> String {
    match stage {
        Some(stage) => format!("{}_{}:{}", stage, category, kind.suffix()),
        None => format!("{}:{}", category, kind.suffix()),
    }
}

/// Convert microseconds to milliseconds
pub fn micro_to_milli(micros: f64) -> f64 {
    micros / 1000.0
}

/// Emits runtime stats histograms into a store
pub struct HistogramEmitter<'a, S: HistogramStore + ?Sized> {
    store: &'a mut S,
    duration_bins: BinBoundaries,
    count_bins: BinBoundaries,
    diagnostic_name: String,
}

impl<'a, S: HistogramStore + ?Sized> HistogramEmitter<'a, S> {
    pub fn new(store: &'a mut S, config: &MetricConfig) -> Result<Self> {
        Ok(Self {
            store,
            duration_bins: config.duration_bins.boundaries()?,
            count_bins: config.count_bins.boundaries()?,
            diagnostic_name: config.stage_diagnostic_name.clone(),
        })
    }

    fn options(&self, kind: MetricKind) -> HistogramOptions {
        let bins = match kind {
            MetricKind::Duration => self.duration_bins.clone(),
            MetricKind::Count => self.count_bins.clone(),
        };
        HistogramOptions::new(bins).with_summary_options(SummaryOptions::runtime_stats())
    }

    /// Emit the stage-scoped pair for one category and record both names
    pub fn emit_stage(
        &mut self,
        stage: &str,
        category: &str,
        time_us: f64,
        count: u64,
        names: &mut StageHistogramNames,
    ) -> Result<()> {
        let duration_name = histogram_name(Some(stage), category, MetricKind::Duration);
        self.store.create_histogram(
            &duration_name,
            MetricKind::Duration.unit(),
            Sample::Value(micro_to_milli(time_us)),
            self.options(MetricKind::Duration),
        )?;
        names.duration.record(category, stage, &duration_name);

        let count_name = histogram_name(Some(stage), category, MetricKind::Count);
        self.store.create_histogram(
            &count_name,
            MetricKind::Count.unit(),
            Sample::Value(count as f64),
            self.options(MetricKind::Count),
        )?;
        names.count.record(category, stage, &count_name);

        Ok(())
    }

    /// Emit the total pair for one category with per-stage breakdowns
    pub fn emit_total(
        &mut self,
        category: &str,
        time_us: f64,
        count: u64,
        names: &StageHistogramNames,
    ) -> Result<()> {
        self.emit_total_kind(
            category,
            MetricKind::Duration,
            micro_to_milli(time_us),
            &names.duration,
        )?;
        self.emit_total_kind(category, MetricKind::Count, count as f64, &names.count)
    }

    fn emit_total_kind(
        &mut self,
        category: &str,
        kind: MetricKind,
        value: f64,
        registry: &NameRegistry,
    ) -> Result<()> {
        let stage_names = registry.stages_for(category);
        let breakdown = self.breakdown(&stage_names);

        let mut sample_diagnostics = DiagnosticMap::new();
        sample_diagnostics.insert(self.diagnostic_name.clone(), Diagnostic::from(breakdown));
        let mut histogram_diagnostics = DiagnosticMap::new();
        histogram_diagnostics.insert(self.diagnostic_name.clone(), Diagnostic::from(stage_names));

        self.store.create_histogram(
            &histogram_name(None, category, kind),
            kind.unit(),
            Sample::WithDiagnostics {
                value,
                diagnostics: sample_diagnostics,
            },
            self.options(kind).with_diagnostics(histogram_diagnostics),
        )
    }

    /// Stage title -> average of that stage's histogram
    fn breakdown(&self, stage_names: &RelatedNameMap) -> Breakdown {
        let mut breakdown = Breakdown::new();
        for (stage, name) in stage_names.iter() {
            match self.store.average(name) {
                Some(average) => breakdown.set(stage, average),
                None => warn!(stage, histogram = name, "no average for stage histogram"),
            }
        }
        breakdown
    }
}
