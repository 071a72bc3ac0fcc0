// Configuration for the runtime stats metric
//
// Defaults reproduce the standard runtime stats histograms; a TOML file can
// override the internal-URL exclusion list, bin layouts, and the name of the
// per-stage diagnostic.

use crate::error::{MetricError, Result};
use crate::histogram::BinBoundaries;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Exponential bin layout `lower..upper` split into `bins` bins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub lower: f64,
    pub upper: f64,
    pub bins: usize,
}

impl BinSpec {
    pub fn boundaries(&self) -> Result<BinBoundaries> {
        BinBoundaries::exponential(self.lower, self.upper, self.bins)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.bins == 0 {
            return Err(MetricError::InvalidConfig(format!(
                "{}.bins must be positive",
                field
            )));
        }
        if self.lower <= 0.0 {
            return Err(MetricError::InvalidConfig(format!(
                "{}.lower must be positive for exponential bins, got {}",
                field, self.lower
            )));
        }
        if self.upper <= self.lower {
            return Err(MetricError::InvalidConfig(format!(
                "{}.upper ({}) must be greater than lower ({})",
                field, self.upper, self.lower
            )));
        }
        Ok(())
    }
}

/// Runtime stats metric configuration
///
/// # Example
/// ```
/// use runtime_stats::config::MetricConfig;
///
/// let config = MetricConfig::default();
/// assert_eq!(config.stage_diagnostic_name, "RAIL stages");
/// assert!(config.is_internal_url("about:blank"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Stage URLs that belong to the browser itself; such stages are skipped
    pub internal_urls: Vec<String>,

    /// Duration histogram bins (milliseconds)
    pub duration_bins: BinSpec,

    /// Count histogram bins
    pub count_bins: BinSpec,

    /// Diagnostic name under which per-stage contributions are attached
    pub stage_diagnostic_name: String,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            internal_urls: vec![
                // Initial empty documents
                String::new(),
                "about:blank".to_string(),
                // Plugin placeholder main frames on Android
                "data:text/html,pluginplaceholderdata".to_string(),
                // Navigations to unreachable error pages
                "chrome-error://chromewebdata/".to_string(),
            ],
            duration_bins: BinSpec {
                lower: 0.1,
                upper: 10_000.0,
                bins: 50,
            },
            count_bins: BinSpec {
                lower: 1.0,
                upper: 1_000_000.0,
                bins: 50,
            },
            stage_diagnostic_name: "RAIL stages".to_string(),
        }
    }
}

impl MetricConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, or fails
    /// validation.
    ///
    /// # Example TOML
    /// ```toml
    /// internal_urls = ["", "about:blank"]
    /// stage_diagnostic_name = "RAIL stages"
    ///
    /// [duration_bins]
    /// lower = 0.1
    /// upper = 10000.0
    /// bins = 50
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MetricConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.duration_bins.validate("duration_bins")?;
        self.count_bins.validate("count_bins")?;
        if self.stage_diagnostic_name.is_empty() {
            return Err(MetricError::InvalidConfig(
                "stage_diagnostic_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_internal_url(&self, url: &str) -> bool {
        self.internal_urls.iter().any(|internal| internal == url)
    }
}
