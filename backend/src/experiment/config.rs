//! Experiment configuration and fingerprinting

use super::ExperimentError;
use crate::methods::Method;
use crate::sampling::{InclusionMode, SamplerConfig};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Seats in the reference chamber
pub const DEFAULT_TOTAL_SEATS: u64 = 435;

/// Repetitions per threshold
pub const DEFAULT_REPETITIONS: usize = 5;

/// Thresholds 0.1, 0.2, ..., 1.0
pub fn default_thresholds() -> Vec<f64> {
    (1..=10).map(|k| k as f64 / 10.0).collect()
}

/// Full description of a threshold sweep
///
/// Every field has a default, so `{}` is a valid JSON config.
///
/// # Example
///
/// ```
/// use apportionment_core_rs::experiment::ExperimentConfig;
///
/// let config: ExperimentConfig = serde_json::from_str(r#"{
///     "total_seats": 10,
///     "thresholds": [0.5],
///     "methods": ["hamilton", "huntington_hill"],
///     "sampler": { "num_samples": 1000, "seed": 3 }
/// }"#).unwrap();
///
/// assert_eq!(config.repetitions, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Seats to apportion in every run
    pub total_seats: u64,

    /// Inclusion probabilities swept by the sampler (outer loop)
    pub thresholds: Vec<f64>,

    /// Runs per threshold (inner loop)
    pub repetitions: usize,

    /// Methods evaluated in each run, in reporting order
    pub methods: Vec<Method>,

    /// Sampler settings; `mode` is overridden per threshold and `seed` is
    /// the base from which every run derives its own seed
    pub sampler: SamplerConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            total_seats: DEFAULT_TOTAL_SEATS,
            thresholds: default_thresholds(),
            repetitions: DEFAULT_REPETITIONS,
            methods: Method::ALL.to_vec(),
            sampler: SamplerConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Reject configurations that cannot produce a meaningful sweep
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.total_seats == 0 {
            return Err(ExperimentError::InvalidConfig(
                "total_seats must be positive".to_string(),
            ));
        }
        if self.repetitions == 0 {
            return Err(ExperimentError::InvalidConfig(
                "repetitions must be positive".to_string(),
            ));
        }
        if self.methods.is_empty() {
            return Err(ExperimentError::InvalidConfig(
                "at least one method is required".to_string(),
            ));
        }
        if self.thresholds.is_empty() {
            return Err(ExperimentError::InvalidConfig(
                "at least one threshold is required".to_string(),
            ));
        }
        if let Some(bad) = self
            .thresholds
            .iter()
            .find(|t| !(0.0..=1.0).contains(*t))
        {
            return Err(ExperimentError::InvalidConfig(format!(
                "threshold {} is outside [0, 1]",
                bad
            )));
        }
        if self.sampler.num_samples == 0 {
            return Err(ExperimentError::InvalidConfig(
                "sampler.num_samples must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of runs per method
    pub fn runs_per_method(&self) -> usize {
        self.thresholds.len() * self.repetitions
    }

    /// SHA256 fingerprint of every field that shapes a sweep's alphas
    ///
    /// Fields are fed to the hasher in declaration order as fixed-width
    /// little-endian words. Lists are length-prefixed and floats are hashed
    /// by their bit pattern.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.total_seats.to_le_bytes());

        hasher.update((self.thresholds.len() as u64).to_le_bytes());
        for threshold in &self.thresholds {
            hasher.update(threshold.to_bits().to_le_bytes());
        }

        hasher.update((self.repetitions as u64).to_le_bytes());

        hasher.update((self.methods.len() as u64).to_le_bytes());
        for method in &self.methods {
            let name = method.name().as_bytes();
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name);
        }

        let sampler = &self.sampler;
        hasher.update(sampler.num_samples.to_le_bytes());
        match sampler.mode {
            InclusionMode::Uniform => hasher.update([0u8]),
            InclusionMode::Threshold { probability } => {
                hasher.update([1u8]);
                hasher.update(probability.to_bits().to_le_bytes());
            }
        }
        hasher.update(sampler.seed.to_le_bytes());
        hasher.update(sampler.chunk_size.to_le_bytes());
        match sampler.time_budget_ms {
            None => hasher.update([0u8]),
            Some(ms) => {
                hasher.update([1u8]);
                hasher.update(ms.to_le_bytes());
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_shape() {
        let config = ExperimentConfig::default();
        assert_eq!(config.total_seats, 435);
        assert_eq!(config.thresholds.len(), 10);
        assert!((config.thresholds[0] - 0.1).abs() < 1e-12);
        assert_eq!(config.thresholds[9], 1.0);
        assert_eq!(config.runs_per_method(), 50);
        assert_eq!(config.methods.len(), 5);
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let config = ExperimentConfig {
            thresholds: vec![0.5, 1.2],
            ..ExperimentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn test_validate_rejects_zero_repetitions() {
        let config = ExperimentConfig {
            repetitions: 0,
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let hash1 = ExperimentConfig::default().fingerprint();
        let hash2 = ExperimentConfig::default().fingerprint();
        assert_eq!(hash1, hash2, "Same config should produce same hash");
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_fingerprint_covers_every_field() {
        let base = ExperimentConfig::default();
        let variants = [
            ExperimentConfig {
                total_seats: 436,
                ..base.clone()
            },
            ExperimentConfig {
                thresholds: vec![0.5],
                ..base.clone()
            },
            ExperimentConfig {
                repetitions: 6,
                ..base.clone()
            },
            ExperimentConfig {
                methods: vec![Method::Webster, Method::Hamilton],
                ..base.clone()
            },
            ExperimentConfig {
                sampler: SamplerConfig {
                    mode: InclusionMode::Threshold { probability: 0.5 },
                    ..base.sampler.clone()
                },
                ..base.clone()
            },
            ExperimentConfig {
                sampler: SamplerConfig {
                    chunk_size: base.sampler.chunk_size + 1,
                    ..base.sampler.clone()
                },
                ..base.clone()
            },
            ExperimentConfig {
                sampler: SamplerConfig {
                    time_budget_ms: Some(0),
                    ..base.sampler.clone()
                },
                ..base.clone()
            },
        ];

        let reference = base.fingerprint();
        for config in &variants {
            assert_ne!(config.fingerprint(), reference, "{:?}", config);
        }
    }

    #[test]
    fn test_fingerprint_method_order_matters() {
        let a = ExperimentConfig {
            methods: vec![Method::Hamilton, Method::Adams],
            ..ExperimentConfig::default()
        };
        let b = ExperimentConfig {
            methods: vec![Method::Adams, Method::Hamilton],
            ..ExperimentConfig::default()
        };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
