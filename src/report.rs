//! Text and JSON rendering of emitted histograms

use crate::histogram::{Diagnostic, Histogram, HistogramSet};
use std::fmt::Write;

/// JSON array of every histogram in the set
pub fn format_json(store: &HistogramSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(store)
}

fn sample_breakdown(histogram: &Histogram) -> Option<String> {
    histogram
        .bins()
        .iter()
        .flat_map(|bin| bin.diagnostic_maps.iter())
        .flat_map(|map| map.values())
        .find_map(|diagnostic| match diagnostic {
            Diagnostic::Breakdown { values } if !values.is_empty() => Some(
                values
                    .iter()
                    .map(|(stage, value)| format!("{}={:.3}", stage, value))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        })
}

/// One line per histogram: name, average, unit, and stage breakdown if any
pub fn format_text(store: &HistogramSet) -> String {
    let mut out = String::new();
    if store.is_empty() {
        out.push_str("No histograms emitted.\n");
        return out;
    }

    let width = store.names().map(str::len).max().unwrap_or(0);
    for histogram in store.iter() {
        let average = histogram
            .average()
            .map_or_else(|| "-".to_string(), |avg| format!("{:.3}", avg));
        let _ = write!(
            out,
            "{:<width$}  {:>12}  {}",
            histogram.name(),
            average,
            histogram.unit(),
            width = width
        );
        if let Some(breakdown) = sample_breakdown(histogram) {
            let _ = write!(out, "  [{}]", breakdown);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricConfig;
    use crate::metric::compute_runtime_stats;
    use crate::trace::{Slice, Stage};

    fn sample_store() -> HistogramSet {
        let slices = vec![Slice::new(0.0, 1500.0, "Parse", 2)];
        let stages = vec![Stage::new("Load", "https://example.com/", 0.0, 5000.0)];
        let mut store = HistogramSet::new();
        compute_runtime_stats(&mut store, &slices, &stages, &MetricConfig::default()).unwrap();
        store
    }

    #[test]
    fn test_text_lists_every_histogram() {
        let store = sample_store();
        let text = format_text(&store);
        assert_eq!(text.lines().count(), store.len());
        assert!(text.contains("Load_Parse:duration"));
        assert!(text.contains("1.500"));
        assert!(text.contains("ms_smallerIsBetter"));
    }

    #[test]
    fn test_text_shows_breakdown_on_totals() {
        let text = format_text(&sample_store());
        let total = text
            .lines()
            .find(|line| line.starts_with("Parse:duration"))
            .unwrap();
        assert!(total.contains("[Load=1.500]"));
    }

    #[test]
    fn test_text_empty_store() {
        assert_eq!(format_text(&HistogramSet::new()), "No histograms emitted.\n");
    }

    #[test]
    fn test_json_is_array() {
        let json = format_json(&sample_store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 16);
    }
}
