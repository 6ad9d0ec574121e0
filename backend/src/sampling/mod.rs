//! Distortion Sampler
//!
//! Estimates how badly an apportionment can under-represent a coalition of
//! entities. See `estimator.rs` for the algorithm and its guarantees.
//!
//! # Example
//!
//! ```rust
//! use apportionment_core_rs::rng::RngManager;
//! use apportionment_core_rs::sampling::{sample_with_rng, InclusionMode};
//! use apportionment_core_rs::{EntityTable, Method};
//!
//! let mut table: EntityTable = vec![
//!     ("A".to_string(), 700),
//!     ("B".to_string(), 300),
//! ]
//! .into_iter()
//! .collect();
//! Method::Adams.apportion(&mut table, 3).unwrap();
//!
//! let mut rng = RngManager::new(42);
//! let estimate = sample_with_rng(&table, 3, InclusionMode::Uniform, 1_000, &mut rng).unwrap();
//!
//! // A holds 70% of the population but only 2 of 3 seats
//! assert!((estimate.alpha - (2.0 / 3.0) / 0.7).abs() < 1e-9);
//! ```

pub mod config;
pub mod estimator;

pub use config::{InclusionMode, SamplerConfig, DEFAULT_CHUNK_SIZE, DEFAULT_NUM_SAMPLES};
pub use estimator::{
    estimate_alpha, sample_with_rng, Coalition, DistortionEstimate, SamplingError, SubsetSampler,
    MIN_POPULATION_SHARE,
};
