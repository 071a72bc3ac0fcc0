// Histogram bin boundaries
//
// Boundaries are recorded as a compact builder (a starting boundary followed
// by single boundaries or linear/exponential slices) and expanded into bin
// ranges. An underflow bin and an overflow bin always bracket the built range.

use crate::error::{MetricError, Result};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Largest finite value, used as the open end of underflow/overflow bins
pub const MAX_VALUE: f64 = f64::MAX;

const SLICE_TYPE_LINEAR: u8 = 0;
const SLICE_TYPE_EXPONENTIAL: u8 = 1;

/// Half-open value range `[min, max)` covered by one bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinRange {
    pub min: f64,
    pub max: f64,
}

impl BinRange {
    fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BoundarySlice {
    Boundary(f64),
    Linear { upper: f64, bins: usize },
    Exponential { upper: f64, bins: usize },
}

impl Serialize for BoundarySlice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            BoundarySlice::Boundary(value) => serializer.serialize_f64(value),
            BoundarySlice::Linear { upper, bins } => {
                (SLICE_TYPE_LINEAR, upper, bins).serialize(serializer)
            }
            BoundarySlice::Exponential { upper, bins } => {
                (SLICE_TYPE_EXPONENTIAL, upper, bins).serialize(serializer)
            }
        }
    }
}

/// Bin layout shared by histograms of the same kind
///
/// # Example
/// ```
/// use runtime_stats::histogram::BinBoundaries;
///
/// let boundaries = BinBoundaries::exponential(0.1, 1e4, 50).unwrap();
/// // 50 exponential bins plus underflow and overflow
/// assert_eq!(boundaries.bin_count(), 52);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinBoundaries {
    min_boundary: f64,
    max_boundary: f64,
    slices: Vec<BoundarySlice>,
    ranges: Vec<BinRange>,
}

impl BinBoundaries {
    /// Start a layout at `min_boundary`
    pub fn new(min_boundary: f64) -> Self {
        let mut boundaries = Self {
            min_boundary,
            max_boundary: min_boundary,
            slices: Vec::new(),
            ranges: Vec::new(),
        };
        boundaries.build_ranges();
        boundaries
    }

    /// `bins` exponentially growing bins between `lower` and `upper`
    pub fn exponential(lower: f64, upper: f64, bins: usize) -> Result<Self> {
        Self::new(lower).add_exponential_bins(upper, bins)
    }

    /// `bins` equally wide bins between `lower` and `upper`
    pub fn linear(lower: f64, upper: f64, bins: usize) -> Result<Self> {
        Self::new(lower).add_linear_bins(upper, bins)
    }

    pub fn add_boundary(mut self, next_max: f64) -> Result<Self> {
        if next_max <= self.max_boundary {
            return Err(MetricError::InvalidBinBoundaries(format!(
                "boundary {} must be larger than the current max boundary {}",
                next_max, self.max_boundary
            )));
        }
        self.push(BoundarySlice::Boundary(next_max), next_max);
        Ok(self)
    }

    pub fn add_linear_bins(mut self, next_max: f64, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(MetricError::InvalidBinBoundaries(
                "bin count must be positive".to_string(),
            ));
        }
        if next_max <= self.max_boundary {
            return Err(MetricError::InvalidBinBoundaries(format!(
                "linear max boundary {} must be greater than the previous max boundary {}",
                next_max, self.max_boundary
            )));
        }
        self.push(
            BoundarySlice::Linear {
                upper: next_max,
                bins,
            },
            next_max,
        );
        Ok(self)
    }

    pub fn add_exponential_bins(mut self, next_max: f64, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(MetricError::InvalidBinBoundaries(
                "bin count must be positive".to_string(),
            ));
        }
        if self.max_boundary <= 0.0 {
            return Err(MetricError::InvalidBinBoundaries(format!(
                "exponential bins need a positive current max boundary, got {}",
                self.max_boundary
            )));
        }
        if next_max <= self.max_boundary {
            return Err(MetricError::InvalidBinBoundaries(format!(
                "exponential max boundary {} must be greater than the current max boundary {}",
                next_max, self.max_boundary
            )));
        }
        self.push(
            BoundarySlice::Exponential {
                upper: next_max,
                bins,
            },
            next_max,
        );
        Ok(self)
    }

    fn push(&mut self, slice: BoundarySlice, next_max: f64) {
        self.slices.push(slice);
        self.max_boundary = next_max;
        self.build_ranges();
    }

    fn build_ranges(&mut self) {
        let mut ranges = Vec::new();
        let mut prev = self.min_boundary;

        if prev > -MAX_VALUE {
            // underflow bin
            ranges.push(BinRange::new(-MAX_VALUE, prev));
        }

        for slice in &self.slices {
            match *slice {
                BoundarySlice::Boundary(next) => {
                    ranges.push(BinRange::new(prev, next));
                    prev = next;
                }
                BoundarySlice::Linear { upper, bins } => {
                    let slice_min = prev;
                    let width = (upper - slice_min) / bins as f64;
                    for i in 1..bins {
                        let boundary = slice_min + i as f64 * width;
                        ranges.push(BinRange::new(prev, boundary));
                        prev = boundary;
                    }
                    ranges.push(BinRange::new(prev, upper));
                    prev = upper;
                }
                BoundarySlice::Exponential { upper, bins } => {
                    let slice_min = prev;
                    let exponent_width = (upper / slice_min).ln() / bins as f64;
                    for i in 1..bins {
                        let boundary = slice_min * (i as f64 * exponent_width).exp();
                        ranges.push(BinRange::new(prev, boundary));
                        prev = boundary;
                    }
                    ranges.push(BinRange::new(prev, upper));
                    prev = upper;
                }
            }
        }

        if prev < MAX_VALUE {
            // overflow bin
            ranges.push(BinRange::new(prev, MAX_VALUE));
        }

        self.ranges = ranges;
    }

    pub fn ranges(&self) -> &[BinRange] {
        &self.ranges
    }

    pub fn bin_count(&self) -> usize {
        self.ranges.len()
    }

    /// Index of the bin a value falls into; values past the last bin land in it
    pub fn bin_index(&self, value: f64) -> usize {
        let index = self.ranges.partition_point(|range| value >= range.max);
        index.min(self.ranges.len().saturating_sub(1))
    }
}

impl Serialize for BinBoundaries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.slices.len() + 1))?;
        seq.serialize_element(&self.min_boundary)?;
        for slice in &self.slices {
            seq.serialize_element(slice)?;
        }
        seq.end()
    }
}
