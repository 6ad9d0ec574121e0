//! Threshold sweep experiments
//!
//! Repeats apportion-then-sample runs over a grid of inclusion thresholds so
//! the methods can be compared on how their worst coalition alpha moves with
//! coalition size.
//!
//! # Critical Invariants
//!
//! 1. Runs are seeded from the base sampler seed and the run index only
//! 2. Results for a failed method carry the error and no statistics
//! 3. The config hash covers every field of `ExperimentConfig`

pub mod config;
pub mod runner;

pub use config::{
    default_thresholds, ExperimentConfig, DEFAULT_REPETITIONS,
    DEFAULT_TOTAL_SEATS,
};
pub use runner::{
    run_single, Experiment, ExperimentResults, MethodOutcome, MethodSeries, SingleRun,
    ThresholdSummary,
};

use crate::methods::ApportionError;
use crate::sampling::SamplingError;
use thiserror::Error;

/// Errors that stop an experiment
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Invalid experiment config: {0}")]
    InvalidConfig(String),

    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Apportionment failed: {0}")]
    Apportion(#[from] ApportionError),
}
