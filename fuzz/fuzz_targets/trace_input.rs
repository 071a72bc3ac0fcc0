#![no_main]

use libfuzzer_sys::fuzz_target;
use runtime_stats::config::MetricConfig;
use runtime_stats::histogram::HistogramSet;
use runtime_stats::metric::compute_runtime_stats;
use runtime_stats::trace::TraceInput;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        // Parsing may fail; a parsed trace must compute without panicking
        if let Ok(input) = TraceInput::from_json_str(json) {
            let mut store = HistogramSet::new();
            let _ = compute_runtime_stats(
                &mut store,
                &input.slices,
                &input.stages,
                &MetricConfig::default(),
            );
        }
    }
});
