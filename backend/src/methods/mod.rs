//! Apportionment Engine
//!
//! Five classical methods that turn populations and a seat total into an
//! integer seat count per entity.
//!
//! # Overview
//!
//! | Method            | Family             | Rounding / selection                 |
//! |-------------------|--------------------|--------------------------------------|
//! | Hamilton          | Largest remainder  | floor of quota, +1 by remainder      |
//! | Jefferson         | Divisor            | round down, divisor only decreases   |
//! | Webster           | Divisor            | round half up, divisor steps ±1      |
//! | Adams             | Divisor            | round up, divisor steps ±1           |
//! | Huntington-Hill   | Priority           | 1 each, then `p / sqrt(n(n+1))`      |
//!
//! # Method Interface
//!
//! All methods implement the `ApportionmentMethod` trait:
//! ```rust
//! use apportionment_core_rs::methods::{ApportionError, ApportionmentMethod};
//! use apportionment_core_rs::EntityTable;
//!
//! struct EverythingToFirst;
//!
//! impl ApportionmentMethod for EverythingToFirst {
//!     fn name(&self) -> &'static str {
//!         "EverythingToFirst"
//!     }
//!
//!     fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
//!         table.reset_seats();
//!         if let Some(first) = table.iter_mut().next() {
//!             first.set_seats(total_seats);
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Callers normally go through the `Method` enum, which is what experiment
//! configurations deserialize into:
//!
//! ```rust
//! use apportionment_core_rs::{EntityTable, Method};
//!
//! let mut table: EntityTable = vec![
//!     ("A".to_string(), 100),
//!     ("B".to_string(), 100),
//!     ("C".to_string(), 300),
//! ]
//! .into_iter()
//! .collect();
//!
//! Method::Hamilton.apportion(&mut table, 5).unwrap();
//! assert_eq!(table.seats(), vec![1, 1, 3]);
//! ```
//!
//! # Critical Invariants
//!
//! 1. On `Ok(())` the seats of all entities sum to exactly the requested total
//! 2. On `Err(_)` seat counts are unspecified and must not be trusted
//! 3. Ties go to the entity first in table order (smallest ID)

use crate::models::EntityTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod adams;
pub mod divisor;
pub mod hamilton;
pub mod huntington_hill;
pub mod jefferson;
pub mod webster;

pub use adams::AdamsMethod;
pub use hamilton::HamiltonMethod;
pub use huntington_hill::HuntingtonHillMethod;
pub use jefferson::JeffersonMethod;
pub use webster::WebsterMethod;

/// Errors reported by the apportionment engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApportionError {
    #[error("Cannot apportion an empty entity table")]
    EmptyTable,

    #[error("Total seats must be positive")]
    NonPositiveSeats,

    #[error("Total population is zero")]
    ZeroPopulation,

    #[error("Total population does not fit in 64 bits")]
    PopulationOverflow,

    #[error("More entities ({entities}) than total seats ({seats})")]
    MoreEntitiesThanSeats { entities: usize, seats: u64 },

    #[error("{method}: divisor reached zero with {assigned} of {target} seats assigned")]
    DivisorExhausted {
        method: &'static str,
        assigned: u64,
        target: u64,
    },

    #[error("{method}: no integer divisor yields {target} seats (divisor {divisor} assigns {assigned})")]
    NoExactDivisor {
        method: &'static str,
        divisor: u64,
        assigned: u64,
        target: u64,
    },
}

/// An apportionment algorithm
///
/// Implementations overwrite every entity's seat count and, on success,
/// leave `table.total_seats() == total_seats`.
pub trait ApportionmentMethod {
    /// Human-readable method name
    fn name(&self) -> &'static str;

    /// Assign seats in place
    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError>;
}

/// Selectable apportionment method
///
/// Deserializes from snake_case names (`"hamilton"`, `"huntington_hill"`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Largest remainder
    Hamilton,
    /// Greatest divisors, round down
    Jefferson,
    /// Major fractions, round to nearest
    Webster,
    /// Smallest divisors, round up
    Adams,
    /// Equal proportions
    HuntingtonHill,
}

impl Method {
    /// All methods in canonical reporting order
    pub const ALL: [Method; 5] = [
        Method::Hamilton,
        Method::Jefferson,
        Method::Webster,
        Method::Adams,
        Method::HuntingtonHill,
    ];

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Method::Hamilton => HamiltonMethod.name(),
            Method::Jefferson => JeffersonMethod.name(),
            Method::Webster => WebsterMethod.name(),
            Method::Adams => AdamsMethod.name(),
            Method::HuntingtonHill => HuntingtonHillMethod.name(),
        }
    }

    /// Run this method on `table`
    pub fn apportion(self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        match self {
            Method::Hamilton => HamiltonMethod.apportion(table, total_seats),
            Method::Jefferson => JeffersonMethod.apportion(table, total_seats),
            Method::Webster => WebsterMethod.apportion(table, total_seats),
            Method::Adams => AdamsMethod.apportion(table, total_seats),
            Method::HuntingtonHill => HuntingtonHillMethod.apportion(table, total_seats),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "hamilton" | "largest_remainder" => Ok(Method::Hamilton),
            "jefferson" | "dhondt" => Ok(Method::Jefferson),
            "webster" | "sainte_lague" => Ok(Method::Webster),
            "adams" => Ok(Method::Adams),
            "huntington_hill" | "hh" | "equal_proportions" => Ok(Method::HuntingtonHill),
            other => Err(format!("Unknown apportionment method '{}'", other)),
        }
    }
}

/// Check the preconditions shared by every method
///
/// Returns the total population on success.
pub(crate) fn validate_inputs(table: &EntityTable, total_seats: u64) -> Result<u64, ApportionError> {
    if table.is_empty() {
        return Err(ApportionError::EmptyTable);
    }
    if total_seats == 0 {
        return Err(ApportionError::NonPositiveSeats);
    }
    match table.total_population() {
        None => Err(ApportionError::PopulationOverflow),
        Some(0) => Err(ApportionError::ZeroPopulation),
        Some(total_population) => Ok(total_population),
    }
}
