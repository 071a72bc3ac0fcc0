// Online summary statistics in O(1) per sample

use super::bin_boundaries::MAX_VALUE;
use serde::Serialize;

/// Running count/mean/variance/min/max/sum over added samples
///
/// Mean and variance use Welford's algorithm. The geometric mean is tracked
/// as a running mean of logarithms and becomes unavailable once any sample
/// is zero or negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningStatistics {
    count: u64,
    mean: f64,
    max: f64,
    min: f64,
    sum: f64,
    variance: f64,
    meanlogs: Option<f64>,
}

impl Default for RunningStatistics {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            max: -MAX_VALUE,
            min: MAX_VALUE,
            sum: 0.0,
            variance: 0.0,
            meanlogs: Some(0.0),
        }
    }
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: f64) {
        self.count += 1;
        self.max = self.max.max(x);
        self.min = self.min.min(x);
        self.sum += x;

        if x <= 0.0 {
            self.meanlogs = None;
        } else if let Some(meanlogs) = self.meanlogs {
            self.meanlogs = Some(meanlogs + (x.abs().ln() - meanlogs) / self.count as f64);
        }

        if self.count == 1 {
            self.mean = x;
            self.variance = 0.0;
        } else {
            let old_mean = self.mean;
            self.mean = if old_mean.is_infinite() {
                self.sum / self.count as f64
            } else {
                old_mean + (x - old_mean) / self.count as f64
            };
            self.variance += (x - old_mean) * (x - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample variance with Bessel's correction
    pub fn variance(&self) -> Option<f64> {
        match self.count {
            0 => None,
            1 => Some(0.0),
            n => Some(self.variance / (n - 1) as f64),
        }
    }

    pub fn stddev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn geometric_mean(&self) -> Option<f64> {
        self.meanlogs.map(f64::exp)
    }
}
