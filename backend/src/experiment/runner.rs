//! Threshold sweep driver
//!
//! Runs every configured method once per (threshold, repetition) pair:
//!
//! ```text
//! for threshold in thresholds        (outer)
//!   for repetition in 0..repetitions (inner)
//!     for method in methods
//!       apportion → sample with Threshold(threshold) → record alpha
//! ```
//!
//! Each run samples with its own seed, derived from the base sampler seed
//! and the run's position in the sweep, so the whole sweep is reproducible.
//!
//! A method whose apportionment fails is dropped from the rest of the sweep
//! and reported as `MethodOutcome::Failed`; the other methods carry on.

use super::config::ExperimentConfig;
use super::ExperimentError;
use crate::methods::{ApportionError, Method};
use crate::models::EntityTable;
use crate::rng::derive_seed;
use crate::sampling::{estimate_alpha, DistortionEstimate, InclusionMode, SamplerConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alpha statistics over the repetitions of one threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    pub threshold: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ThresholdSummary {
    /// Summarize one group of alphas
    ///
    /// # Panics
    ///
    /// Panics if `alphas` is empty.
    pub fn from_alphas(threshold: f64, alphas: &[f64]) -> Self {
        assert!(!alphas.is_empty(), "cannot summarize an empty group");
        let n = alphas.len() as f64;
        let mean = alphas.iter().sum::<f64>() / n;
        let variance = alphas.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
        Self {
            threshold,
            mean,
            std_dev: variance.sqrt(),
            min: alphas.iter().copied().fold(f64::INFINITY, f64::min),
            max: alphas.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// What happened to one method across the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodOutcome {
    /// Every run finished
    Completed {
        /// One alpha per run, threshold-major order
        alphas: Vec<f64>,
        /// One summary per threshold
        groups: Vec<ThresholdSummary>,
    },

    /// Apportionment failed; no statistics were recorded
    Failed { error: String },
}

/// Sweep results for one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSeries {
    pub method: Method,
    pub outcome: MethodOutcome,
}

impl MethodSeries {
    /// Alphas of a completed method, `None` if it failed
    pub fn alphas(&self) -> Option<&[f64]> {
        match &self.outcome {
            MethodOutcome::Completed { alphas, .. } => Some(alphas),
            MethodOutcome::Failed { .. } => None,
        }
    }
}

/// Results of a full sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResults {
    /// Unique identifier of this execution
    pub run_id: Uuid,
    /// SHA256 of the configuration
    pub config_hash: String,
    pub total_seats: u64,
    pub thresholds: Vec<f64>,
    pub repetitions: usize,
    /// One entry per configured method, in configuration order
    pub series: Vec<MethodSeries>,
}

impl ExperimentResults {
    /// Series for `method`, if it was part of the sweep
    pub fn series_for(&self, method: Method) -> Option<&MethodSeries> {
        self.series.iter().find(|s| s.method == method)
    }
}

/// Result of apportioning once and sampling once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleRun {
    pub method: Method,
    /// (id, population, seats) in table order
    pub allocation: Vec<(String, u64, u64)>,
    pub estimate: DistortionEstimate,
}

enum Progress {
    Running(Vec<f64>),
    Failed(ApportionError),
}

/// Configured sweep, ready to run against a table
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    config_hash: String,
}

impl Experiment {
    /// Validate and fingerprint a configuration
    pub fn new(config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.validate()?;
        let config_hash = config.fingerprint();
        Ok(Self {
            config,
            config_hash,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Get configuration hash
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Run the full sweep, overwriting the table's seats along the way
    pub fn run(&self, table: &mut EntityTable) -> Result<ExperimentResults, ExperimentError> {
        let config = &self.config;
        let mut progress: Vec<Progress> = config
            .methods
            .iter()
            .map(|_| Progress::Running(Vec::with_capacity(config.runs_per_method())))
            .collect();

        info!(
            "sweep: {} method(s) x {} threshold(s) x {} repetition(s), {} seats",
            config.methods.len(),
            config.thresholds.len(),
            config.repetitions,
            config.total_seats
        );

        let mut run_index = 0u64;
        for &threshold in &config.thresholds {
            for repetition in 0..config.repetitions {
                info!("=== threshold {:.1}, run {} ===", threshold, repetition);

                for (slot, &method) in progress.iter_mut().zip(&config.methods) {
                    let seed = derive_seed(config.sampler.seed, run_index);
                    run_index += 1;

                    let Progress::Running(alphas) = &mut *slot else {
                        continue;
                    };

                    if let Err(error) = method.apportion(table, config.total_seats) {
                        warn!("{} halted: {}", method, error);
                        *slot = Progress::Failed(error);
                        continue;
                    }

                    let sampler = SamplerConfig {
                        mode: InclusionMode::Threshold {
                            probability: threshold,
                        },
                        seed,
                        ..config.sampler.clone()
                    };
                    let estimate = estimate_alpha(table, config.total_seats, &sampler)?;
                    info!("{}: alpha <= {:.6} (sampled)", method, estimate.alpha);
                    alphas.push(estimate.alpha);
                }
            }
        }

        let series = config
            .methods
            .iter()
            .zip(progress)
            .map(|(&method, state)| MethodSeries {
                method,
                outcome: match state {
                    Progress::Running(alphas) => MethodOutcome::Completed {
                        groups: self.summarize(&alphas),
                        alphas,
                    },
                    Progress::Failed(error) => MethodOutcome::Failed {
                        error: error.to_string(),
                    },
                },
            })
            .collect();

        Ok(ExperimentResults {
            run_id: Uuid::new_v4(),
            config_hash: self.config_hash.clone(),
            total_seats: config.total_seats,
            thresholds: config.thresholds.clone(),
            repetitions: config.repetitions,
            series,
        })
    }

    fn summarize(&self, alphas: &[f64]) -> Vec<ThresholdSummary> {
        self.config
            .thresholds
            .iter()
            .zip(alphas.chunks(self.config.repetitions))
            .map(|(&threshold, group)| ThresholdSummary::from_alphas(threshold, group))
            .collect()
    }
}

/// Apportion once with `method` and estimate its alpha
pub fn run_single(
    table: &mut EntityTable,
    method: Method,
    total_seats: u64,
    sampler: &SamplerConfig,
) -> Result<SingleRun, ExperimentError> {
    method.apportion(table, total_seats)?;
    let estimate = estimate_alpha(table, total_seats, sampler)?;
    let allocation = table
        .iter()
        .map(|e| (e.id().to_string(), e.population(), e.seats()))
        .collect();

    Ok(SingleRun {
        method,
        allocation,
        estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_population_std_dev() {
        let summary = ThresholdSummary::from_alphas(0.5, &[1.0, 3.0]);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.std_dev, 1.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    #[should_panic(expected = "cannot summarize an empty group")]
    fn test_summary_empty_group_panics() {
        ThresholdSummary::from_alphas(0.5, &[]);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ExperimentConfig {
            methods: vec![],
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            Experiment::new(config),
            Err(ExperimentError::InvalidConfig(_))
        ));
    }
}
