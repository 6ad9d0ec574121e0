//! Adams' method (smallest divisors, round up)
//!
//! Same control structure as Webster with a ceiling instead of rounding.
//! Every entity with a positive population keeps at least one seat whatever
//! the divisor, so a seat total below the number of populated entities can
//! never be met and is reported once the divisor passes every population.

use super::divisor::{linear_search, Rounding, SearchDirection};
use super::{validate_inputs, ApportionError, ApportionmentMethod};
use crate::models::EntityTable;

/// Adams apportionment
#[derive(Debug, Clone, Copy, Default)]
pub struct AdamsMethod;

impl ApportionmentMethod for AdamsMethod {
    fn name(&self) -> &'static str {
        "Adams"
    }

    fn apportion(&self, table: &mut EntityTable, total_seats: u64) -> Result<(), ApportionError> {
        let total_population = validate_inputs(table, total_seats)?;
        linear_search(
            self.name(),
            table,
            total_seats,
            total_population,
            Rounding::Up,
            SearchDirection::Bidirectional,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, u64)]) -> EntityTable {
        rows.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    #[test]
    fn test_favours_small_entities() {
        let mut t = table(&[("BIG", 9_000), ("SMALL", 1_000)]);
        AdamsMethod.apportion(&mut t, 10).unwrap();
        assert_eq!(t.seats(), vec![9, 1]);

        let mut t = table(&[("BIG", 9_500), ("SMALL", 500)]);
        AdamsMethod.apportion(&mut t, 10).unwrap();
        assert_eq!(t.total_seats(), 10);
        assert!(t.get("SMALL").unwrap().seats() >= 1);
    }

    #[test]
    fn test_fewer_seats_than_populated_entities() {
        let mut t = table(&[("A", 10), ("B", 10), ("C", 10)]);
        let err = AdamsMethod.apportion(&mut t, 2).unwrap_err();
        assert!(matches!(err, ApportionError::NoExactDivisor { method: "Adams", .. }));
    }

    #[test]
    fn test_zero_population_entity_gets_nothing() {
        let mut t = table(&[("A", 500), ("B", 0), ("C", 500)]);
        AdamsMethod.apportion(&mut t, 4).unwrap();
        assert_eq!(t.get("B").unwrap().seats(), 0);
        assert_eq!(t.total_seats(), 4);
    }
}
