use anyhow::{Context, Result};
use clap::Parser;
use runtime_stats::cli::{Cli, OutputFormat};
use runtime_stats::config::MetricConfig;
use runtime_stats::histogram::HistogramSet;
use runtime_stats::trace::TraceInput;
use runtime_stats::{metric, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<MetricConfig> {
    match &args.config {
        Some(path) => MetricConfig::from_toml(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(MetricConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let input = TraceInput::from_file(&args.input)?;

    let mut store = HistogramSet::new();
    let summary = metric::compute_runtime_stats(&mut store, &input.slices, &input.stages, &config)
        .context("Failed to compute runtime stats")?;
    tracing::debug!(
        stages = summary.stages.len(),
        histograms = store.len(),
        "runtime stats computed"
    );

    let rendered = match args.format {
        OutputFormat::Text => report::format_text(&store),
        OutputFormat::Json => report::format_json(&store).context("Failed to serialize histograms")?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}
