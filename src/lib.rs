//! Runtime Stats - breakdown of runtime call stats by category and stage
//!
//! This library buckets runtime call stats slices into user-facing stages,
//! aggregates each bucket into per-category time and count, derives
//! engine-only and main-thread-only totals, and emits the results as
//! histograms whose trace-wide totals carry a per-stage breakdown.

pub mod cli;
pub mod config;
pub mod derived;
pub mod emitter;
pub mod error;
pub mod histogram;
pub mod metric;
pub mod names;
pub mod report;
pub mod runtime_group;
pub mod stage_bucketer;
pub mod trace;

pub use error::{MetricError, Result};
