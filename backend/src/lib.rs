//! Apportionment Core - Rust Engine
//!
//! Seat apportionment methods and a Monte Carlo estimator of how badly an
//! apportionment can under-represent a coalition of entities.
//!
//! # Architecture
//!
//! - **models**: Domain types (Entity, EntityTable)
//! - **methods**: Apportionment engine (Hamilton, Jefferson, Webster, Adams, Huntington-Hill)
//! - **sampling**: Distortion sampler (worst coalition alpha)
//! - **experiment**: Threshold sweeps across methods
//! - **loader**: CSV input
//! - **report**: Plain-text rendering
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All populations and seats are u64; quotas are compared in exact integer arithmetic
//! 2. All randomness is deterministic (seeded RNG, passed explicitly)
//! 3. A successful apportionment assigns exactly the requested seat total
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod experiment;
pub mod loader;
pub mod methods;
pub mod models;
pub mod report;
pub mod rng;
pub mod sampling;

// Re-exports for convenience
pub use experiment::{
    run_single, Experiment, ExperimentConfig, ExperimentError, ExperimentResults, MethodOutcome,
};
pub use loader::{load_entity_table, load_or_empty, LoadError};
pub use methods::{ApportionError, ApportionmentMethod, Method};
pub use models::{Entity, EntityTable};
pub use rng::RngManager;
pub use sampling::{
    estimate_alpha, Coalition, DistortionEstimate, InclusionMode, SamplerConfig, SamplingError,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn apportionment_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::apportion, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::estimate_alpha, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::method_names, m)?)?;
    Ok(())
}
