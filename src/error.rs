//! Error types for the runtime stats metric

use thiserror::Error;

/// Errors raised while shaping or emitting runtime stats histograms
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("Histogram already exists: {name}")]
    DuplicateHistogram { name: String },

    #[error("Call count overflow while accumulating category '{category}'")]
    CountOverflow { category: String },

    #[error("Category name '{name}' is emitted twice: {reason}")]
    CategoryCollision { name: String, reason: String },

    #[error("Invalid bin boundaries: {0}")]
    InvalidBinBoundaries(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime stats operations
pub type Result<T> = std::result::Result<T, MetricError>;
