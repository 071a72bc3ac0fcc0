//! CLI argument parsing for runtime-stats

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for emitted histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per histogram (default)
    Text,
    /// JSON array of histograms
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "runtime-stats")]
#[command(version)]
#[command(about = "Break runtime call stats down by category and user-facing stage", long_about = None)]
pub struct Cli {
    /// Trace input JSON with "slices" and "stages"
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Metric configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,
}
