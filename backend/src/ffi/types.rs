//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, tuples).

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::models::EntityTable;
use crate::sampling::{DistortionEstimate, InclusionMode};

/// Map any displayable error to a Python `ValueError`
pub(crate) fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// Build a table from `(id, population)` tuples
pub(crate) fn table_from_rows(rows: Vec<(String, u64)>) -> EntityTable {
    rows.into_iter().collect()
}

/// Build an apportioned table from `(id, population, seats)` tuples
///
/// A repeated ID keeps the last row, seats included.
pub(crate) fn table_from_allocation(rows: Vec<(String, u64, u64)>) -> EntityTable {
    let mut table = EntityTable::new();
    for (id, population, seats) in rows {
        table.insert(id.clone(), population);
        if let Some(entity) = table.get_mut(&id) {
            entity.set_seats(seats);
        }
    }
    table
}

/// Inclusion mode from an optional threshold argument
pub(crate) fn mode_from_threshold(threshold: Option<f64>) -> InclusionMode {
    match threshold {
        Some(probability) => InclusionMode::Threshold { probability },
        None => InclusionMode::Uniform,
    }
}

/// Convert a distortion estimate to a Python dict
///
/// Keys: `alpha`, `worst` (list of IDs or None), `population_share`,
/// `seat_share`, `samples_drawn`, `samples_accepted`.
pub(crate) fn estimate_to_py<'py>(
    py: Python<'py>,
    estimate: &DistortionEstimate,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("alpha", estimate.alpha)?;
    dict.set_item(
        "worst",
        estimate.worst.as_ref().map(|w| w.members.clone()),
    )?;
    dict.set_item(
        "population_share",
        estimate.worst.as_ref().map(|w| w.population_share),
    )?;
    dict.set_item(
        "seat_share",
        estimate.worst.as_ref().map(|w| w.seat_share),
    )?;
    dict.set_item("samples_drawn", estimate.samples_drawn)?;
    dict.set_item("samples_accepted", estimate.samples_accepted)?;
    Ok(dict)
}
