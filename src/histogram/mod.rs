// Histogram collaborator
//
// Emitted runtime stats land in a histogram store. The store owns binning,
// summary statistics, and diagnostics; the metric only decides names, units,
// values, and which diagnostics to attach.

mod bin_boundaries;
mod diagnostics;
mod running;
mod set;
mod value;

pub use bin_boundaries::{BinBoundaries, BinRange, MAX_VALUE};
pub use diagnostics::{Breakdown, Diagnostic, DiagnosticMap, RelatedNameMap};
pub use running::RunningStatistics;
pub use set::{HistogramOptions, HistogramSet, HistogramStore, Sample};
pub use value::{
    BaseUnit, Histogram, HistogramBin, ImprovementDirection, SummaryOptions, Unit,
    MAX_DIAGNOSTIC_MAPS,
};
