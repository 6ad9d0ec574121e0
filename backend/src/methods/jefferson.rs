//! Jefferson's method (greatest divisors, round down)
//!
//! Starts from the standard divisor `floor(P / S)` and only ever lowers it.
//! Lowering the divisor can only add seats, so once the total overshoots the
//! target no smaller divisor can recover and the method reports
//! `NoExactDivisor`.

use super::divisor::{linear_search, Rounding, SearchDirection};
use super::{validate_inputs, ApportionError, ApportionmentMethod};
use crate::models::EntityTable;

/// Jefferson apportionment
///
/// # Example
///
/// ```
/// use apportionment_core_rs::methods::{ApportionmentMethod, JeffersonMethod};
/// use apportionment_core_rs::EntityTable;
///
/// let mut table: EntityTable = vec![
///     ("A".to_string(), 600),
///     ("B".to_string(), 300),
///     ("C".to_string(), 100),
/// ]
/// .into_iter()
/// .collect();
///
/// JeffersonMethod.apportion(&mut table, 10).unwrap();
/// assert_eq!(table.seats(), vec![6, 3, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JeffersonMethod;

impl ApportionmentMethod for JeffersonMethod {
    fn name(&self) -> &'static str {
        "Jefferson"
    }

    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        let total_population = validate_inputs(table, total_seats)?;
        linear_search(
            self.name(),
            table,
            total_seats,
            total_population,
            Rounding::Down,
            SearchDirection::DecreasingOnly,
        )?;
        Ok(())
    }
}
