//! CSV input loader
//!
//! Reads a two-column file of `id,population` rows into an `EntityTable`.
//! The first row is a header and is always skipped.
//!
//! Rows missing either field are dropped silently. Rows whose population is
//! not a non-negative integer are dropped with a warning. A later row with
//! an already-seen ID replaces the earlier one.

use crate::models::EntityTable;
use csv::{ReaderBuilder, Trim};
use log::{debug, error, warn};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading an entity table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Load an entity table from a CSV file
///
/// # Errors
///
/// `LoadError::NotFound` if the file does not exist, `Io` for other open
/// failures and `Csv` if a record cannot be decoded.
pub fn load_entity_table(path: impl AsRef<Path>) -> Result<EntityTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;

    let table = read_entity_table(file)?;
    debug!("loaded {} entities from {}", table.len(), path.display());
    Ok(table)
}

/// Load an entity table, logging failures and falling back to an empty table
///
/// The engine rejects empty tables, so callers still get a clear error at
/// the point of use.
pub fn load_or_empty(path: impl AsRef<Path>) -> EntityTable {
    let path = path.as_ref();
    match load_entity_table(path) {
        Ok(table) => table,
        Err(e) => {
            error!("could not load {}: {}", path.display(), e);
            EntityTable::new()
        }
    }
}

/// Read `id,population` rows from any reader
///
/// # Example
///
/// ```
/// use apportionment_core_rs::loader::read_entity_table;
///
/// let csv = "State,Population\nOhio,11799448\nUtah,3271616\n";
/// let table = read_entity_table(csv.as_bytes()).unwrap();
///
/// assert_eq!(table.ids(), vec!["Ohio", "Utah"]);
/// assert_eq!(table.total_population(), Some(15_071_064));
/// ```
pub fn read_entity_table<R: Read>(reader: R) -> Result<EntityTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut table = EntityTable::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result?;

        let (id, population) = match (record.get(0), record.get(1)) {
            (Some(id), Some(population)) if !id.is_empty() && !population.is_empty() => {
                (id, population)
            }
            _ => continue,
        };

        match population.parse::<u64>() {
            Ok(population) => table.insert(id.to_string(), population),
            Err(_) => warn!(
                "skipping line {}: population {:?} for {} is not a whole number",
                line_num + 2,
                population,
                id
            ),
        }
    }

    Ok(table)
}
