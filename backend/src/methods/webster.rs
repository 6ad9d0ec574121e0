//! Webster's method (major fractions, round to nearest)
//!
//! Seats are `population / divisor` rounded half up. The divisor moves by
//! exactly one unit per pass: up when too many seats were handed out, down
//! when too few.

use super::divisor::{linear_search, Rounding, SearchDirection};
use super::{validate_inputs, ApportionError, ApportionmentMethod};
use crate::models::EntityTable;

/// Webster apportionment
#[derive(Debug, Clone, Copy, Default)]
pub struct WebsterMethod;

impl ApportionmentMethod for WebsterMethod {
    fn name(&self) -> &'static str {
        "Webster"
    }

    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        let total_population = validate_inputs(table, total_seats)?;
        linear_search(
            self.name(),
            table,
            total_seats,
            total_population,
            Rounding::Nearest,
            SearchDirection::Bidirectional,
        )?;
        Ok(())
    }
}
