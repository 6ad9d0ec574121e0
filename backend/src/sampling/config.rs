//! Sampler configuration

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Default number of subsets drawn per estimate
pub const DEFAULT_NUM_SAMPLES: u64 = 100_000_000;

/// Default number of draws per parallel work unit
pub const DEFAULT_CHUNK_SIZE: u64 = 1 << 20;

/// How each entity is included in a random subset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InclusionMode {
    /// Each entity included independently with probability 0.5
    #[default]
    Uniform,

    /// Each entity included independently with the given probability
    ///
    /// Steers sampling toward coalitions of roughly `probability * n`
    /// entities.
    Threshold { probability: f64 },
}

impl InclusionMode {
    /// Draw one inclusion decision
    #[inline]
    pub fn include(&self, rng: &mut RngManager) -> bool {
        match *self {
            InclusionMode::Uniform => rng.next_bool(),
            InclusionMode::Threshold { probability } => rng.bernoulli(probability),
        }
    }

    /// Inclusion probability of a single entity
    pub fn probability(&self) -> f64 {
        match *self {
            InclusionMode::Uniform => 0.5,
            InclusionMode::Threshold { probability } => probability,
        }
    }
}

/// Configuration for one distortion estimate
///
/// # Example
///
/// ```
/// use apportionment_core_rs::sampling::{InclusionMode, SamplerConfig};
///
/// let config = SamplerConfig {
///     num_samples: 10_000,
///     mode: InclusionMode::Threshold { probability: 0.7 },
///     seed: 42,
///     ..SamplerConfig::default()
/// };
/// assert_eq!(config.chunk_size, 1 << 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Total subsets to draw
    pub num_samples: u64,

    /// Inclusion rule per entity
    pub mode: InclusionMode,

    /// Base seed; each chunk derives its own stream from it
    pub seed: u64,

    /// Draws per parallel work unit (0 is treated as 1)
    pub chunk_size: u64,

    /// Optional wall-clock budget in milliseconds
    ///
    /// Chunks stop drawing once the budget is spent; the estimate reports
    /// how many samples were actually drawn.
    pub time_budget_ms: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            mode: InclusionMode::Uniform,
            seed: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            time_budget_ms: None,
        }
    }
}
