//! Python bindings
//!
//! Thin wrappers over the engine and the sampler. All errors surface as
//! `ValueError`.
//!
//! ```python
//! from apportionment_core_rs import apportion, estimate_alpha
//!
//! seats = apportion("hamilton", [("A", 100), ("B", 100), ("C", 300)], 5)
//! rows = [(k, p, seats[k]) for k, p in [("A", 100), ("B", 100), ("C", 300)]]
//! result = estimate_alpha(rows, 5, 100_000, threshold=0.5, seed=7)
//! print(result["alpha"], result["worst"])
//! ```

pub mod types;

use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::BTreeMap;

use crate::methods::Method;
use crate::sampling::{self, SamplerConfig};
use types::{estimate_to_py, mode_from_threshold, table_from_allocation, table_from_rows, value_error};

/// Apportion `seats` among `(id, population)` rows with the named method
///
/// Returns a dict of id to seats.
#[pyfunction]
pub fn apportion(
    method: &str,
    entities: Vec<(String, u64)>,
    seats: u64,
) -> PyResult<BTreeMap<String, u64>> {
    let method: Method = method.parse().map_err(value_error)?;
    let mut table = table_from_rows(entities);
    method.apportion(&mut table, seats).map_err(value_error)?;
    Ok(table
        .iter()
        .map(|e| (e.id().to_string(), e.seats()))
        .collect())
}

/// Estimate the worst coalition alpha of an apportioned `(id, population, seats)` list
///
/// Sampling runs on the rayon pool with the GIL released.
#[pyfunction]
#[pyo3(signature = (entities, seats, samples, threshold=None, seed=0))]
pub fn estimate_alpha<'py>(
    py: Python<'py>,
    entities: Vec<(String, u64, u64)>,
    seats: u64,
    samples: u64,
    threshold: Option<f64>,
    seed: u64,
) -> PyResult<Bound<'py, PyDict>> {
    let table = table_from_allocation(entities);
    let config = SamplerConfig {
        num_samples: samples,
        mode: mode_from_threshold(threshold),
        seed,
        ..SamplerConfig::default()
    };

    let estimate = py
        .allow_threads(|| sampling::estimate_alpha(&table, seats, &config))
        .map_err(value_error)?;
    estimate_to_py(py, &estimate)
}

/// Names accepted by `apportion`
#[pyfunction]
pub fn method_names() -> Vec<&'static str> {
    Method::ALL.iter().map(|m| m.name()).collect()
}
